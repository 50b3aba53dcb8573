//! Decoding smali type descriptors into readable type names.
//!
//! A descriptor is either a single-letter primitive code (`I`, `Z`, `V`, ...),
//! an object path wrapped in `L` and `;` (`Ljava/lang/String;`), or an array
//! marker `[` in front of another descriptor.
//!
//! ```
//! # use smali2java::LeniencyLevel;
//! # use smali2java::descriptor::decode;
//! assert_eq!(decode("I", LeniencyLevel::Lenient).unwrap(), "Integer");
//! assert_eq!(decode("Ljava/lang/String;", LeniencyLevel::Lenient).unwrap(), "java.lang.String");
//! assert_eq!(decode("[Z", LeniencyLevel::Lenient).unwrap(), "Boolean[]");
//! ```

use itertools::Itertools;

use crate::error::DescriptorError;
use crate::LeniencyLevel;

const PATH_DELIMITER: char = '/';
const NAMESPACE_DELIMITER: &str = ".";
const OBJECT_PREFIX: char = 'L';
const OBJECT_SUFFIX: char = ';';
const ARRAY_MARKER: char = '[';

/// Decoded names that mean "no superclass worth mentioning".
const ROOT_OBJECT_NAMES: [&str; 2] = ["java.lang.Object", "Object"];

/// Readable name for a one-letter descriptor. Letters outside the table are `Object`.
pub fn primitive(code: char) -> &'static str {
    match code {
        'I' => "Integer",
        'Z' => "Boolean",
        'J' => "Long",
        'F' => "Float",
        'D' => "Double",
        'V' => "void",
        _ => "Object",
    }
}

/// Deepest array nesting a descriptor may have, as on the JVM.
pub const MAX_ARRAY_DIMENSIONS: usize = 255;

/// Turn a descriptor into the name of the type it describes.
///
/// When the last path segment of the descriptor is a single character it is
/// looked up with [`primitive`]. Otherwise each leading `[` adds a `[]` to the
/// name of what follows, up to [`MAX_ARRAY_DIMENSIONS`]. What's left is joined
/// with `.` and its first and last characters are dropped. Under
/// [`LeniencyLevel::Lenient`] those two characters aren't checked, so a
/// descriptor missing its `L` or `;` loses a real character instead of failing.
pub fn decode(descriptor: &str, leniency: LeniencyLevel) -> Result<String, DescriptorError> {
    let mut component = descriptor;
    let mut dimensions = 0;
    let name = loop {
        if let Some(code) = single_char(last_segment(component)) {
            break primitive(code).to_string();
        }
        match component.strip_prefix(ARRAY_MARKER) {
            Some(inner) => {
                dimensions += 1;
                if dimensions > MAX_ARRAY_DIMENSIONS {
                    let depth = descriptor.len() - descriptor.trim_start_matches(ARRAY_MARKER).len();
                    return Err(DescriptorError::TooManyDimensions(depth));
                }
                component = inner;
            }
            None => break decode_object(component, leniency)?,
        }
    };
    Ok(name + &"[]".repeat(dimensions))
}

fn decode_object(descriptor: &str, leniency: LeniencyLevel) -> Result<String, DescriptorError> {
    if descriptor.is_empty() {
        return Err(DescriptorError::Empty);
    }

    if leniency.requires_descriptor_wrapper() && !is_wrapped_object(descriptor) {
        return Err(DescriptorError::NotAnObject(descriptor.to_string()));
    }

    let joined = descriptor.split(PATH_DELIMITER).join(NAMESPACE_DELIMITER);
    let mut unwrapped = joined.chars();
    unwrapped.next();
    unwrapped.next_back();
    Ok(unwrapped.as_str().to_string())
}

fn last_segment(descriptor: &str) -> &str {
    descriptor.rsplit(PATH_DELIMITER).next().unwrap_or(descriptor)
}

fn single_char(segment: &str) -> Option<char> {
    let mut chars = segment.chars();
    match (chars.next(), chars.next()) {
        (Some(code), None) => Some(code),
        _ => None,
    }
}

fn is_wrapped_object(descriptor: &str) -> bool {
    descriptor.len() > 2
        && descriptor.starts_with(OBJECT_PREFIX)
        && descriptor.ends_with(OBJECT_SUFFIX)
}

/// The part of a decoded name after the last `.`.
pub fn simple_name(name: &str) -> &str {
    name.rsplit(NAMESPACE_DELIMITER).next().unwrap_or(name)
}

pub fn is_root_object(name: &str) -> bool {
    ROOT_OBJECT_NAMES.contains(&name)
}
