use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use super::ConvertError;

/// Run an external renderer, feeding `input` on stdin and capturing stdout.
///
/// Stdin is written from a scoped thread so a renderer that starts producing
/// output before it has read all of its input cannot deadlock on full pipes.
/// The call blocks until the renderer exits; there is no timeout. Pipes and
/// the child handle are released on every return path.
pub fn run_renderer(program: &Path, args: &[&str], input: &[u8]) -> Result<Vec<u8>, ConvertError> {
    log::debug!("running renderer {} {}", program.display(), args.join(" "));

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ConvertError::Spawn {
            program: program.to_path_buf(),
            source,
        })?;

    let stdin = child.stdin.take();
    let (written, output) = thread::scope(|scope| {
        let writer = scope.spawn(move || match stdin {
            // Dropping `pipe` at the end of the closure closes the child's stdin.
            Some(mut pipe) => pipe.write_all(input),
            None => Ok(()),
        });
        let output = child.wait_with_output();
        let written = writer
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
        (written, output)
    });

    let output = output.map_err(|source| ConvertError::Io {
        program: program.to_path_buf(),
        source,
    })?;

    if !output.status.success() {
        return Err(ConvertError::Exit {
            program: program.to_path_buf(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    // A renderer may legitimately stop reading early; only other write
    // failures mean its output cannot be trusted.
    match written {
        Err(source) if source.kind() != ErrorKind::BrokenPipe => Err(ConvertError::Io {
            program: program.to_path_buf(),
            source,
        }),
        _ => Ok(output.stdout),
    }
}
