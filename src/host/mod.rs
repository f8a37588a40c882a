//! Editor hosts for the completion engine
//!
//! Real editors implement [`EditorHost`](crate::completion::EditorHost) on
//! their own widgets. [`BufferHost`] is a plain in-memory buffer used by the
//! command line tool and the tests.

mod buffer;

pub use buffer::{BufferHost, HostEvent, keystrokes};
