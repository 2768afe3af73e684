// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::svgtree::AId;

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// An attribute has an invalid value.
    AttributeValue {
        /// Element's tag name.
        element: String,
        /// Attribute name.
        attribute: AId,
        /// The offending value.
        value: String,
    },

    /// A reference cannot be resolved into a URL.
    MalformedReference {
        /// The reference as written in the document.
        href: String,
        /// The underlying parsing error.
        cause: url::ParseError,
    },

    /// A chain of references links back to an already visited element.
    CircularReference {
        /// The URL of the repeated reference.
        href: String,
    },

    /// A reference points to an element that doesn't exist.
    MissingReference {
        /// The URL of the missing element.
        href: String,
    },

    /// A reference points to an element of the wrong kind.
    InvalidReference {
        /// The URL of the referenced element.
        href: String,
    },

    /// Only UTF-8 content are supported.
    NotAnUtf8Str,

    /// Compressed SVG must use the GZip algorithm.
    MalformedGZip,

    /// We do not allow SVG with more than 1_000_000 elements for security reasons.
    ElementsLimitReached,

    /// Failed to parse an SVG data.
    ParsingFailed(roxmltree::Error),
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::ParsingFailed(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::AttributeValue {
                ref element,
                attribute,
                ref value,
            } => {
                write!(
                    f,
                    "'{}' has an invalid '{}' value: '{}'",
                    element, attribute, value
                )
            }
            Error::MalformedReference {
                ref href,
                ref cause,
            } => {
                write!(f, "malformed reference '{}' cause {}", href, cause)
            }
            Error::CircularReference { ref href } => {
                write!(f, "circular reference to '{}'", href)
            }
            Error::MissingReference { ref href } => {
                write!(f, "referenced element '{}' doesn't exist", href)
            }
            Error::InvalidReference { ref href } => {
                write!(f, "'{}' cannot be referenced here", href)
            }
            Error::NotAnUtf8Str => {
                write!(f, "provided data has not an UTF-8 encoding")
            }
            Error::MalformedGZip => {
                write!(f, "provided data has a malformed GZip content")
            }
            Error::ElementsLimitReached => {
                write!(f, "the maximum number of SVG elements has been reached")
            }
            Error::ParsingFailed(ref e) => {
                write!(f, "SVG data parsing failed cause {}", e)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::MalformedReference { ref cause, .. } => Some(cause),
            Error::ParsingFailed(ref e) => Some(e),
            _ => None,
        }
    }
}
