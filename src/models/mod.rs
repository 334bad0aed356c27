use serde::{Deserialize, Serialize};

pub mod call_report;
pub mod camera;
pub mod incident;
pub mod lost_item;
pub mod port_event;
pub mod role;
pub mod user;
pub mod work_permit;

/// A file stored on disk for a record; `name` is the stored file name
/// (id-derived), never the client-supplied one.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Attachment {
    pub name: String,
    pub extension: String,
}
