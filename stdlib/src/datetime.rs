//! Dates, times and durations.

use shale_core::registry::{StdFunction, StdStruct};

pub fn functions() -> Vec<StdFunction> {
    vec![
        StdFunction::new("now", 0, 0),
        StdFunction::new("today", 0, 0),
        StdFunction::new("parse", 1, 2),
        StdFunction::new("format", 2, 2),
        StdFunction::new("sleep", 1, 1),
    ]
}

pub fn structs() -> Vec<StdStruct> {
    vec![
        // year, month, day, hour, minute, second
        super::structure("DateTime", 0, 6),
        // days, hours, minutes, seconds, milliseconds
        super::structure("Duration", 0, 5),
    ]
}
