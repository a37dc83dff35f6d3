mod event;
mod sink;

pub use event::{
    Event, PayloadSearchNotFound, PayloadSelectionChanged, PayloadViewportTransformChanged,
    SelectionKind,
};
pub use sink::EventSink;
