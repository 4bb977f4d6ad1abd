//! Thin field setters generated from one name table.

use super::EventBuilder;
use super::value::FieldValue;

macro_rules! field_setters {
    ($($(#[$meta:meta])* $method:ident => $key:literal,)*) => {
        /// Every generated setter paired with the field it writes.
        pub const FIELD_SETTERS: &[(&str, &str)] = &[$((stringify!($method), $key)),*];

        impl EventBuilder<'_> {
            $(
                $(#[$meta])*
                #[must_use]
                pub fn $method(self, value: impl Into<FieldValue>) -> Self {
                    self.field($key, value)
                }
            )*
        }
    };
}

field_setters! {
    /// Receiving device (`totype`).
    to => "totype",
    /// Sending device (`fromtype`).
    from => "fromtype",
    system => "system",
    ip => "ip",
    host => "host",
    method => "method",
    path => "path",
    body => "body",
    query => "query",
    result => "result",
    other => "other",
    /// Alarm identifier (`alarmID`).
    alarm => "alarmID",
}
