/* Pure casing/naming transforms for emitted identifiers. */

/* Lower-case the leading character: `GetWidget` -> `getWidget`. */
pub fn camel_case(name: &str) -> String {
  let mut chars = name.chars();
  match chars.next() {
    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
    None => String::new(),
  }
}

/* Best-effort singular form of a field name: `ids` -> `id`. Names that do
 * not end in a plural `s` pass through unchanged. */
pub fn singular(name: &str) -> String {
  if name.len() > 1 && name.ends_with('s') && !name.ends_with("ss") {
    name[..name.len() - 1].to_string()
  } else {
    name.to_string()
  }
}
