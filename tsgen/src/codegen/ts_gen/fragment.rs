/* Structured code fragments with symbolic type references.
 *
 * Emitters build `Frag` values carrying text plus the imports the text
 * needs; `render_file` resolves a file body into final source with a
 * deduplicated, deterministically ordered import block. Interpolating a
 * fragment into another via `write!` copies text only - the enclosing
 * fragment must `adopt` the child's imports. */

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Import {
  /* import { name } from "module"; */
  Named { name: String, module: String },
  /* import name from "module"; */
  Default { name: String, module: String },
}

#[derive(Clone, Debug, Default)]
pub struct Frag {
  text: String,
  imports: BTreeSet<Import>,
}

impl Frag {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn lit(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      imports: BTreeSet::new(),
    }
  }

  /* A symbol imported by name: `import { name } from "module";`. */
  pub fn named(name: &str, module: &str) -> Self {
    Self {
      text: name.to_string(),
      imports: BTreeSet::from([Import::Named {
        name: name.to_string(),
        module: module.to_string(),
      }]),
    }
  }

  /* A module's default export: `import name from "module";`. */
  pub fn default_import(name: &str, module: &str) -> Self {
    Self {
      text: name.to_string(),
      imports: BTreeSet::from([Import::Default {
        name: name.to_string(),
        module: module.to_string(),
      }]),
    }
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn is_empty(&self) -> bool {
    self.text.is_empty()
  }

  pub fn push_str(&mut self, text: &str) {
    self.text.push_str(text);
  }

  /* Append another fragment, text and imports both. */
  pub fn push(&mut self, other: &Frag) {
    self.text.push_str(&other.text);
    self.adopt(other);
  }

  /* Absorb another fragment's imports without appending its text. Used
   * when the other fragment was interpolated through `write!`. */
  pub fn adopt(&mut self, other: &Frag) {
    self.imports.extend(other.imports.iter().cloned());
  }

  pub fn join(parts: &[Frag], separator: &str) -> Frag {
    let mut joined = Frag::new();
    for (index, part) in parts.iter().enumerate() {
      if index > 0 {
        joined.push_str(separator);
      }
      joined.push(part);
    }
    joined
  }
}

impl fmt::Display for Frag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.text)
  }
}

impl fmt::Write for Frag {
  fn write_str(&mut self, s: &str) -> fmt::Result {
    self.text.push_str(s);
    Ok(())
  }
}

/* Resolve a file body into final source text: generated-file header,
 * import block, body. Imports pointing back at the file's own module are
 * dropped; the rest are grouped per module and ordered by module path,
 * names sorted within a group. */
pub fn render_file(body: &Frag, module_path: &str) -> String {
  let self_module = format!("./{}", module_path);

  let mut defaults: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
  let mut named: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
  for import in &body.imports {
    match import {
      Import::Named { name, module } if *module != self_module => {
        named.entry(module).or_default().insert(name);
      }
      Import::Default { name, module } if *module != self_module => {
        defaults.entry(module).or_default().insert(name);
      }
      _ => {}
    }
  }

  let mut output = String::new();
  output.push_str("/* Auto-generated TypeScript code */\n");
  output.push_str(
    "/* WARNING: Do not modify this file directly. It is generated from protobuf descriptors. */\n",
  );

  let modules: BTreeSet<&str> = defaults.keys().chain(named.keys()).copied().collect();
  if !modules.is_empty() {
    output.push('\n');
    for module in modules {
      if let Some(names) = defaults.get(module) {
        for name in names {
          output.push_str(&format!("import {} from \"{}\";\n", name, module));
        }
      }
      if let Some(names) = named.get(module) {
        let list: Vec<&str> = names.iter().copied().collect();
        output.push_str(&format!("import {{ {} }} from \"{}\";\n", list.join(", "), module));
      }
    }
  }

  output.push('\n');
  output.push_str(&body.text);
  output
}
