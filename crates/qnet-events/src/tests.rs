//! Unit tests for qnet-events.

use qnet_core::{LegMode, LinkId, PersonId, Time, VehicleId};

use crate::{EventKind, EventStream, EventWriter};

fn act_end(person: u32) -> EventKind {
    EventKind::ActivityEnd {
        person:   PersonId(person),
        link:     LinkId(0),
        act_type: "home".into(),
    }
}

fn departure(person: u32) -> EventKind {
    EventKind::Departure {
        person: PersonId(person),
        link:   LinkId(0),
        mode:   LegMode::Car,
    }
}

fn link_leave(vehicle: u32) -> EventKind {
    EventKind::LinkLeave { vehicle: VehicleId(vehicle), link: LinkId(0) }
}

fn link_enter(vehicle: u32) -> EventKind {
    EventKind::LinkEnter { vehicle: VehicleId(vehicle), link: LinkId(1) }
}

fn arrival(person: u32) -> EventKind {
    EventKind::Arrival { person: PersonId(person), link: LinkId(1), mode: LegMode::Car }
}

#[cfg(test)]
mod ordering {
    use super::*;

    #[test]
    fn same_time_events_sort_by_declared_priority() {
        let mut stream = EventStream::new(Time(0));
        // Emission follows engine phase order: activity phase first, then the
        // link phase — i.e. departure arrives before the link events.
        stream.emit(act_end(0));
        stream.emit(departure(0));
        stream.emit(link_leave(1));
        stream.emit(link_enter(1));
        stream.finish();

        let labels: Vec<&str> = stream.events().iter().map(|e| e.kind.label()).collect();
        assert_eq!(labels, ["actend", "left_link", "entered_link", "departure"]);
    }

    #[test]
    fn arrival_sorts_between_link_leave_and_link_enter() {
        // A parking vehicle must free its storage slot in the stream before a
        // same-second admission takes it, whatever the emission order was.
        let mut stream = EventStream::new(Time(0));
        stream.emit(link_enter(1));
        stream.emit(arrival(2));
        stream.emit(link_leave(3));
        stream.finish();

        let labels: Vec<&str> = stream.events().iter().map(|e| e.kind.label()).collect();
        assert_eq!(labels, ["left_link", "arrival", "entered_link"]);
    }

    #[test]
    fn equal_priority_keeps_emission_order() {
        let mut stream = EventStream::new(Time(0));
        stream.emit(link_leave(3));
        stream.emit(link_leave(1));
        stream.emit(link_leave(2));
        stream.finish();

        let vehicles: Vec<u32> = stream
            .events()
            .iter()
            .map(|e| match e.kind {
                EventKind::LinkLeave { vehicle, .. } => vehicle.0,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(vehicles, [3, 1, 2]);
    }

    #[test]
    fn steps_flush_in_time_order() {
        let mut stream = EventStream::new(Time(0));
        stream.emit(departure(0));
        stream.advance(Time(1));
        stream.emit(act_end(1));
        stream.advance(Time(5));
        stream.emit(act_end(2));
        stream.finish();

        let times: Vec<u32> = stream.events().iter().map(|e| e.time.0).collect();
        assert_eq!(times, [0, 1, 5]);
    }

    #[test]
    fn advance_to_same_time_is_noop() {
        let mut stream = EventStream::new(Time(7));
        stream.emit(act_end(0));
        stream.advance(Time(7));
        // Still pending — not yet flushed.
        assert_eq!(stream.events().len(), 0);
        assert_eq!(stream.len(), 1);
        stream.finish();
        assert_eq!(stream.events().len(), 1);
    }

    #[test]
    #[should_panic(expected = "finished event stream")]
    fn emit_after_finish_panics() {
        let mut stream = EventStream::new(Time(0));
        stream.finish();
        stream.emit(act_end(0));
    }
}

#[cfg(test)]
mod accessors {
    use super::*;

    #[test]
    fn person_and_link_extraction() {
        let kind = departure(9);
        assert_eq!(kind.person(), Some(PersonId(9)));
        assert_eq!(kind.link(), LinkId(0));
        assert_eq!(link_enter(4).person(), None);
    }

    #[test]
    fn priorities_match_declared_contract() {
        assert_eq!(act_end(0).priority(), 0);
        assert_eq!(link_leave(0).priority(), 1);
        assert_eq!(arrival(0).priority(), 2);
        assert_eq!(link_enter(0).priority(), 3);
        assert_eq!(departure(0).priority(), 4);
    }
}

#[cfg(test)]
mod writer {
    use super::*;

    #[test]
    fn csv_rows_and_header() {
        let mut stream = EventStream::new(Time(0));
        stream.emit(act_end(0));
        stream.emit(departure(0));
        stream.emit(link_enter(7));
        stream.finish();

        let mut buf = Vec::new();
        {
            let mut writer = EventWriter::from_writer(&mut buf).unwrap();
            writer.write_all(stream.events()).unwrap();
            writer.finish().unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "time,type,person,vehicle,link,mode,act_type");
        assert_eq!(lines[1], "0,actend,0,,0,,home");
        assert_eq!(lines[2], "0,entered_link,,7,1,,");
        assert_eq!(lines[3], "0,departure,0,,0,car,");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");
        let mut writer = EventWriter::create(&path).unwrap();
        let event = crate::Event { time: Time(1), kind: link_leave(2) };
        writer.write(&event).unwrap();
        writer.finish().unwrap();
        drop(writer);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("1,left_link,,2,0,,"));
    }
}
