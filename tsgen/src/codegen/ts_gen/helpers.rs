/* Small emission helpers shared by the data-type and service emitters. */

use std::fmt::Write;

use super::fragment::Frag;

/* Escape TypeScript keywords used as property names. */
pub fn escape_ts_keyword(name: &str) -> String {
  match name {
    "break" | "case" | "catch" | "class" | "const" | "continue" | "debugger" | "default"
    | "delete" | "do" | "else" | "enum" | "export" | "extends" | "false" | "finally" | "for"
    | "function" | "if" | "import" | "in" | "instanceof" | "new" | "null" | "return" | "super"
    | "switch" | "this" | "throw" | "true" | "try" | "typeof" | "var" | "void" | "while"
    | "with" | "as" | "implements" | "interface" | "let" | "package" | "private" | "protected"
    | "public" | "static" | "yield" | "any" | "boolean" | "constructor" | "declare" | "get"
    | "module" | "require" | "number" | "set" | "string" | "symbol" | "type" | "from" | "of"
    | "namespace" | "async" | "await" => format!("{}_", name),
    _ => name.to_string(),
  }
}

/* Attach a JSDoc block for a declaration's leading comment and/or its
 * deprecation flag. Emits nothing when there is neither. */
pub fn maybe_add_comment(out: &mut Frag, indent: &str, comment: Option<&str>, deprecated: bool) {
  let lines: Vec<&str> = comment
    .map(|text| text.lines().map(str::trim_end).collect())
    .unwrap_or_default();

  if lines.is_empty() && !deprecated {
    return;
  }

  if lines.len() == 1 && !deprecated {
    writeln!(out, "{}/** {} */", indent, lines[0].trim()).unwrap();
    return;
  }
  if lines.is_empty() {
    writeln!(out, "{}/** @deprecated */", indent).unwrap();
    return;
  }

  writeln!(out, "{}/**", indent).unwrap();
  for line in &lines {
    let line = line.trim();
    if line.is_empty() {
      writeln!(out, "{} *", indent).unwrap();
    } else {
      writeln!(out, "{} * {}", indent, line).unwrap();
    }
  }
  if deprecated {
    writeln!(out, "{} *", indent).unwrap();
    writeln!(out, "{} * @deprecated", indent).unwrap();
  }
  writeln!(out, "{} */", indent).unwrap();
}
