//! Newtype IDs for type-safe document references.
//!
//! Catalog documents are keyed by strings: admin-created records get a
//! millisecond timestamp, seeded records get a slug of their name. Use the
//! `define_id!` macro to create wrappers that prevent mixing IDs from
//! different collections.

use chrono::{DateTime, Utc};

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `from_timestamp()`
/// - `From<String>`, `From<&str>`, and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use mousse_melts_core::define_id;
/// define_id!(OrderId);
/// define_id!(InvoiceId);
///
/// let order_id = OrderId::new("1700000000000");
/// let invoice_id = InvoiceId::new("1700000000000");
///
/// // These are different types, so this won't compile:
/// // let _: OrderId = invoice_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Create an ID from a creation timestamp (milliseconds since epoch).
            #[must_use]
            pub fn from_timestamp(at: ::chrono::DateTime<::chrono::Utc>) -> Self {
                Self($crate::types::id::timestamp_id(at))
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the ID is the empty string.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(CouponId);

impl ProductId {
    /// Derive a deterministic product ID from a display name.
    ///
    /// See [`slugify`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self(slugify(name))
    }
}

/// Render a timestamp as a millisecond-precision ID string.
#[must_use]
pub fn timestamp_id(at: DateTime<Utc>) -> String {
    at.timestamp_millis().to_string()
}

/// Turn a display name into a URL-safe slug.
///
/// The name is lowercased, each run of whitespace becomes a single `-`, and
/// every character outside `[a-z0-9-]` is dropped. Dropped characters still
/// end a whitespace run, so `"Cakes & Pastries"` becomes `"cakes--pastries"`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_slugify_simple_name() {
        assert_eq!(slugify("Red Velvet Cupcake"), "red-velvet-cupcake");
    }

    #[test]
    fn test_slugify_collapses_whitespace_runs() {
        assert_eq!(slugify("Mini   Puffs"), "mini-puffs");
        assert_eq!(slugify("Tres\tLeches"), "tres-leches");
    }

    #[test]
    fn test_slugify_drops_punctuation() {
        assert_eq!(slugify("Cakes & Pastries"), "cakes--pastries");
        assert_eq!(slugify("Mom's Banana Bread!"), "moms-banana-bread");
    }

    #[test]
    fn test_product_id_from_name() {
        assert_eq!(ProductId::from_name("Nutella Sundae").as_str(), "nutella-sundae");
    }

    #[test]
    fn test_timestamp_id() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).single();
        let id = at.map(ProductId::from_timestamp);
        assert_eq!(id, Some(ProductId::new("1700000000123")));
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = CouponId::new("abc");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"abc\""));
    }
}
