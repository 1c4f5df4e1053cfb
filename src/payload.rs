// IDAT assembly: concatenate every IDAT payload, in file order, up to IEND.
// Growth goes through try_reserve so an OOM is reported, not aborted on;
// the partial buffer is dropped on every error path.

use alloc::vec::Vec;

use crate::chunk::{CHUNK_IDAT, ChunkScanner};
use crate::error::{DecodeError, Stage};

/// Collect the compressed stream starting at `offset` (the chunk after IHDR).
pub fn collect_idat(data: &[u8], offset: usize) -> Result<Vec<u8>, DecodeError> {
    let mut idat = Vec::new();
    let mut count = 0usize;

    for chunk in ChunkScanner::new(data, offset) {
        let chunk = chunk?;
        if !chunk.is(CHUNK_IDAT) {
            continue;
        }
        let payload = chunk.payload(data);
        idat.try_reserve(payload.len())
            .map_err(|_| DecodeError::OutOfMemory)?;
        idat.extend_from_slice(payload);
        count += 1;
    }

    if idat.is_empty() {
        log::debug!("png: no IDAT data ({} chunks)", count);
        return Err(DecodeError::malformed(Stage::ChunkScan));
    }

    log::debug!("png: {} IDAT chunks, {} bytes", count, idat.len());
    Ok(idat)
}
