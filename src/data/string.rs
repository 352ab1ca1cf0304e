//! Uniform string capability over the string types callers already hold.

use std::borrow::Cow;
use std::rc::Rc;

/// Anything usable as a JSON string or object key.
///
/// `None` from [`as_json_str`](StringLike::as_json_str) is the null string,
/// which equals only another null string and can never be stored as a key.
pub trait StringLike {
    /// Borrow the string contents, or `None` for the null string.
    fn as_json_str(&self) -> Option<&str>;
}

impl StringLike for str {
    fn as_json_str(&self) -> Option<&str> {
        Some(self)
    }
}

impl StringLike for String {
    fn as_json_str(&self) -> Option<&str> {
        Some(self)
    }
}

impl StringLike for Rc<str> {
    fn as_json_str(&self) -> Option<&str> {
        Some(self)
    }
}

impl StringLike for Box<str> {
    fn as_json_str(&self) -> Option<&str> {
        Some(self)
    }
}

impl StringLike for Cow<'_, str> {
    fn as_json_str(&self) -> Option<&str> {
        Some(self)
    }
}

impl<T: StringLike + ?Sized> StringLike for &T {
    fn as_json_str(&self) -> Option<&str> {
        (**self).as_json_str()
    }
}

impl<T: StringLike> StringLike for Option<T> {
    fn as_json_str(&self) -> Option<&str> {
        self.as_ref().and_then(|s| s.as_json_str())
    }
}
