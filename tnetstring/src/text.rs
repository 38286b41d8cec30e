//! The string fallback for values outside the tnetstring data model.
//!
//! Anything implementing `ToText` can be wrapped into an `Extension` and placed inside a `Value`.
//! The encoder writes its text as a byte string, the decoder will consequently never produce an
//! `Extension`. Types which can not provide a text make `dump` fail with
//! `EncodeError::UnserializableType`.

use std::borrow::Cow;
use std::fmt::{self, Debug, Display};
use std::sync::Arc;

/// The capability of being written as a string.
pub trait ToText {
    /// `None` if there is no sensible text for this value.
    fn to_text(&self) -> Option<Cow<'_, str>>;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl ToText for str {
    fn to_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl ToText for String {
    fn to_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

/// Adapts any `Display` type.
struct Shown<T>(T);

impl<T: Display> ToText for Shown<T> {
    fn to_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.0.to_string()))
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A foreign value which is encoded through its text.
#[derive(Clone)]
pub struct Extension(Arc<dyn ToText + Send + Sync>);

impl Extension {

    pub fn new<T: ToText + Send + Sync + 'static>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Uses the `Display` implementation of `value` as its text
    pub fn display<T: Display + Send + Sync + 'static>(value: T) -> Self {
        Self(Arc::new(Shown(value)))
    }

    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        self.0.to_text()
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

}

impl Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => write!(f, "Extension({}: {:?})", self.type_name(), text),
            None       => write!(f, "Extension({})", self.type_name()),
        }
    }
}

/// Extensions are equal if they are the same object or produce the same text.
impl PartialEq for Extension {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        match (self.to_text(), other.to_text()) {
            (Some(a), Some(b)) => a == b,
            _                  => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Extension, ToText};
    use std::borrow::Cow;
    use std::net::Ipv4Addr;

    struct Opaque;

    impl ToText for Opaque {
        fn to_text(&self) -> Option<Cow<'_, str>> {
            None
        }
    }

    #[test]
    fn display_types() {
        let ext = Extension::display(Ipv4Addr::LOCALHOST);
        assert_eq!(Some("127.0.0.1"), ext.to_text().as_deref());
        assert!(ext.type_name().ends_with("Ipv4Addr"));
    }

    #[test]
    fn equality() {
        let ext = Extension::new(Opaque);
        assert_eq!(ext, ext.clone());
        assert_ne!(ext, Extension::new(Opaque));
        assert_eq!(Extension::display(42), Extension::new("42".to_string()));
    }

}
