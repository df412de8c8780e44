//! Artifact naming.
//!
//! An artifact base name is the submitter's identity line plus a version
//! suffix, reduced to a filesystem-safe allow-list:
//! `"12 - Ada Lovelace - ada (v2)"`.

/// Characters allowed in artifact base names besides ASCII letters and digits.
const EXTRA_ALLOWED: &[char] = &['-', '_', '.', '(', ')', ' '];

/// `"<id> - <full name> - <username>"` with non-ASCII characters dropped.
pub fn identity_line(id_number: &str, full_name: &str, username: &str) -> String {
    format!("{id_number} - {full_name} - {username}")
        .chars()
        .filter(char::is_ascii)
        .collect()
}

/// Keep only allow-listed characters, preserving their order.
pub fn sanitize_filename(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || EXTRA_ALLOWED.contains(c))
        .collect()
}

/// Sanitized `"<identity> (v<version>)"`.
pub fn artifact_base_name(identity: &str, version: u32) -> String {
    sanitize_filename(&format!("{identity} (v{version})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disallowed_characters_are_stripped_in_order() {
        assert_eq!(sanitize_filename("Jane O'Brien; 2024"), "Jane OBrien 2024");
    }

    #[test]
    fn identity_drops_non_ascii() {
        assert_eq!(identity_line("12", "José Núñez", "jnunez"), "12 - Jos Nez - jnunez");
    }

    #[test]
    fn base_name_embeds_version() {
        assert_eq!(
            artifact_base_name("12 - Ada Lovelace - ada", 3),
            "12 - Ada Lovelace - ada (v3)"
        );
    }

    #[test]
    fn path_separators_never_survive() {
        let name = artifact_base_name("1 - ../../etc/passwd - x", 1);
        assert!(!name.contains('/'));
        assert!(!name.contains('\\'));
    }
}
