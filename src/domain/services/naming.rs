//! Default names and download filenames

/// Upper-case the first letter of every word, e.g. `half-elf wizard` → `Half-Elf Wizard`
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for c in input.chars() {
        if at_word_start && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

/// Name given to a fresh draft when the generator did not supply one
pub fn default_character_name(race: &str, class: &str) -> String {
    let race = if race.is_empty() { "Race" } else { race };
    let class = if class.is_empty() { "Class" } else { class };
    title_case(&format!("{} {}", race, class))
}

/// Collapse whitespace runs into underscores for a filename stem
pub fn file_stem(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Pull `filename="..."` out of a Content-Disposition header
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let start = header.find("filename=\"")? + "filename=\"".len();
    let rest = &header[start..];
    let end = rest.find('"')?;
    let name = &rest[..end];
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name_is_title_cased() {
        assert_eq!(default_character_name("half-elf", "wizard"), "Half-Elf Wizard");
        assert_eq!(default_character_name("", "rogue"), "Race Rogue");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Blade of  the Dawn"), "Blade_of_the_Dawn");
    }

    #[test]
    fn test_filename_from_disposition() {
        assert_eq!(
            filename_from_disposition("attachment; filename=\"Brom_Dwarf.pdf\"").as_deref(),
            Some("Brom_Dwarf.pdf")
        );
        assert_eq!(filename_from_disposition("attachment"), None);
        assert_eq!(filename_from_disposition("attachment; filename=\"\""), None);
    }
}
