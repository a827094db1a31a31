//! Streaming file transfer

use crate::context::UploadRequest;
use crate::{GsendError, Result};
use gsend_ssh::{RemoteFile, RemoteFs, MAX_PACKET_SIZE};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Remote path for `source` inside the remote directory `dir`.
///
/// Remote paths always use `/`, whatever the local platform. A file name
/// that is not valid UTF-8 is rejected rather than renamed.
pub fn remote_target(dir: &str, source: &Path) -> Result<String> {
    let name = source
        .file_name()
        .ok_or_else(|| GsendError::SourceNotAFile(source.to_path_buf()))?
        .to_str()
        .ok_or_else(|| GsendError::SourceNameNotUtf8(source.to_path_buf()))?;

    let trimmed = dir.trim_end_matches('/');
    Ok(if trimmed.is_empty() && dir.starts_with('/') {
        format!("/{}", name)
    } else if trimmed.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", trimmed, name)
    })
}

/// Copy `reader` into `writer` in chunks of at most `chunk_size` bytes.
///
/// Returns the number of bytes copied. Interrupted reads are retried.
pub fn copy_chunked<R, W>(reader: &mut R, writer: &mut W, chunk_size: usize) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }

    writer.flush()?;
    Ok(total)
}

/// Create the remote file and stream the source into it
pub fn upload(fs: &mut dyn RemoteFs, request: &UploadRequest) -> Result<u64> {
    let remote = request.remote_path();
    info!("sending file");

    let mut writer = fs.create(remote)?;
    let mut source = File::open(request.source()).map_err(|source| GsendError::SourceOpen {
        path: request.source().to_path_buf(),
        source,
    })?;

    let copy_error = |source: io::Error| GsendError::Copy {
        remote: remote.to_string(),
        source,
    };
    let written = copy_chunked(&mut source, &mut *writer, MAX_PACKET_SIZE).map_err(copy_error)?;
    writer.close().map_err(copy_error)?;
    debug!("Copied {} bytes to {}", written, remote);

    Ok(written)
}
