/// Sparkplug B namespace once an MQTT topic has been mapped onto a NATS subject
pub const SPBV01_SUBJECT: &str = "spBv1//0";

pub const SUBJECT_SEPARATOR: char = '.';
/// namespace, group, message type and edge node
pub const MIN_SUBJECT_PARTS: usize = 4;

pub const NBIRTH: &str = "NBIRTH";
pub const NDEATH: &str = "NDEATH";
pub const NDATA: &str = "NDATA";
pub const NCMD: &str = "NCMD";

pub const DBIRTH: &str = "DBIRTH";
pub const DDEATH: &str = "DDEATH";
pub const DDATA: &str = "DDATA";
pub const DCMD: &str = "DCMD";

pub const STATE: &str = "STATE";
