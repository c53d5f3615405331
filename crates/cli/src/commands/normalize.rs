use std::path::Path;
use std::process;

use metatest_core::{deserialize, serialize, serialize_pretty, try_deserialize};

use crate::input::read_json;
use crate::{report_error, InputFormat, OutputFormat};

/// Load a definition and write it back in canonical form.
///
/// Without `--strict`, unreadable definitions become the default
/// definition, exactly as the loader does.
pub(crate) fn cmd_normalize(
    path: &Path,
    input: Option<InputFormat>,
    pretty: bool,
    strict: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let json = read_json(path, input, output, quiet);

    let definition = if strict {
        match try_deserialize(&json) {
            Ok(d) => d,
            Err(e) => {
                let msg = format!("error normalizing '{}': {}", path.display(), e);
                report_error(&msg, output, quiet);
                process::exit(1);
            }
        }
    } else {
        deserialize(&json)
    };

    if pretty {
        println!("{}", serialize_pretty(&definition));
    } else {
        println!("{}", serialize(&definition));
    }
}
