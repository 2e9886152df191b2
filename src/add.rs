//! Interactive creation of a registry entry

use std::io::{BufRead, Write};

use tracing::info;

use crate::error::AddError;
use crate::library::Library;
use crate::store::RegistryStore;

const PROMPTS: [&str; 5] = [
    "Library name (e.g. prometheus): ",
    "Current version (e.g. 1.6.2): ",
    "URL: ",
    "Regex: ",
    "Hook file (under the hooks/ folder): ",
];

/// Prompts for a new entry on `output`, reads the answers from `input`,
/// appends the entry to the registry and saves it.
///
/// Answers are trimmed; an empty hook means no hook. Nothing is validated here,
/// a bad URL or pattern only surfaces on the next check.
pub fn add_library<R, W>(
    store: &dyn RegistryStore,
    mut input: R,
    mut output: W,
) -> Result<Library, AddError>
where
    R: BufRead,
    W: Write,
{
    let name = ask(&mut input, &mut output, PROMPTS[0])?;
    let version = ask(&mut input, &mut output, PROMPTS[1])?;
    let url = ask(&mut input, &mut output, PROMPTS[2])?;
    let regex = ask(&mut input, &mut output, PROMPTS[3])?;
    let hook = ask(&mut input, &mut output, PROMPTS[4])?;

    let library = Library {
        name,
        version,
        url,
        regex,
        hook: Some(hook).filter(|h| !h.is_empty()),
    };

    let mut libraries = store.load_or_empty()?;
    libraries.push(library.clone());
    store.save(&libraries)?;
    info!(
        "Added {} to registry ({} entries)",
        library.name,
        libraries.len()
    );

    writeln!(output, "\nLibrary added:\n{library:#?}")?;
    Ok(library)
}

fn ask(
    input: &mut impl BufRead,
    output: &mut impl Write,
    prompt: &str,
) -> std::io::Result<String> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
