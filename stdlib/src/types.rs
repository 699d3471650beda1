/// Names usable in type position (`catch e: Error`, `x is Integer`).
pub const RUNTIME_TYPES: &[&str] = &[
    "Integer",
    "Float",
    "String",
    "Boolean",
    "Nil",
    "List",
    "Tuple",
    "Set",
    "Dictionary",
    "Range",
    "Type",
    "Pipe",
    "Error",
    "Function",
    "Struct",
];
