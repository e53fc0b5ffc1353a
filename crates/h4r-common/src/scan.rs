//! Byte-signature scanning.
//!
//! Used to locate embedded streams in regions of an archive that the entry
//! table does not describe.

use memchr::memmem;

/// The three leading bytes of every gzip member (magic + deflate method).
pub const GZIP_SIGNATURE: [u8; 3] = [0x1F, 0x8B, 0x08];

/// Find every offset at which `needle` starts in `haystack`.
///
/// Overlapping occurrences are all reported.
pub fn find_all(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }
    let finder = memmem::Finder::new(needle);
    let mut offsets = Vec::new();
    let mut start = 0;
    while let Some(pos) = finder.find(&haystack[start..]) {
        offsets.push(start + pos);
        start += pos + 1;
    }
    offsets
}

/// Find every offset of a gzip member header.
#[inline]
pub fn find_gzip_signatures(data: &[u8]) -> Vec<usize> {
    find_all(data, &GZIP_SIGNATURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_gzip_signatures() {
        let mut data = vec![0u8; 16];
        data[2..5].copy_from_slice(&GZIP_SIGNATURE);
        data[10..13].copy_from_slice(&GZIP_SIGNATURE);

        assert_eq!(find_gzip_signatures(&data), vec![2, 10]);
    }

    #[test]
    fn test_overlapping_matches() {
        assert_eq!(find_all(b"aaaa", b"aa"), vec![0, 1, 2]);
    }

    #[test]
    fn test_no_match() {
        assert!(find_gzip_signatures(&[0x1F, 0x8B, 0x07, 0x1F]).is_empty());
        assert!(find_all(b"abc", b"").is_empty());
    }
}
