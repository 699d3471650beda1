//! Terminal and file I/O.

use shale_core::registry::{StdFunction, StdStruct};

pub fn functions() -> Vec<StdFunction> {
    vec![
        StdFunction::new("input", 0, 1),
        StdFunction::new("read", 1, 1),
        StdFunction::new("write", 2, 2),
        StdFunction::new("append", 2, 2),
        StdFunction::new("exists", 1, 1),
        StdFunction::new("remove", 1, 1),
        StdFunction::new("readLines", 1, 1),
        StdFunction::new("stream", 1, 1).consuming_pipe(),
    ]
}

pub fn structs() -> Vec<StdStruct> {
    vec![super::structure("File", 1, 2), super::structure("Path", 1, 1)]
}
