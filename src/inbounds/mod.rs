/// +----------------------------------------------------------+
/// | MODULES                                                  |
/// +----------------------------------------------------------+
/// | Exports:                                                 |
/// |   - course_events                                        |
/// +----------------------------------------------------------+

/// Decoding of course events received from the broker.
pub mod course_events;

pub use course_events::decode_course_event;
