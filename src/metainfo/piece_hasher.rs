use sha1::{Digest, Sha1};

/// Length of a v1 piece hash (SHA1).
pub const PIECE_HASH_LEN: usize = 20;

/// Splits a logical byte stream into fixed-size pieces and hashes each one.
///
/// Bytes from consecutive [`feed`](Self::feed) calls are treated as one
/// continuous stream, so a piece may span several files. The running SHA1
/// state stands in for the piece buffer: at most `piece_length - 1` bytes are
/// ever pending, and only their hash state is held.
///
/// ```
/// use torrentize::metainfo::PieceHasher;
///
/// let mut hasher = PieceHasher::new(4);
/// hasher.feed(b"abcde");
/// hasher.feed(b"fgh");
/// hasher.feed(b"i");
///
/// let pieces = hasher.finalize();
/// assert_eq!(pieces.len(), 3); // "abcd", "efgh", "i"
/// ```
#[derive(Debug, Clone)]
pub struct PieceHasher {
    piece_length: u64,
    current: Sha1,
    buffered: u64,
    total: u64,
    pieces: Vec<[u8; PIECE_HASH_LEN]>,
}

impl PieceHasher {
    /// Creates a hasher for pieces of `piece_length` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `piece_length` is zero; callers validate it beforehand.
    pub fn new(piece_length: u64) -> Self {
        assert!(piece_length > 0, "piece length must be positive");
        Self {
            piece_length,
            current: Sha1::new(),
            buffered: 0,
            total: 0,
            pieces: Vec::new(),
        }
    }

    /// Appends bytes to the stream, completing as many pieces as they fill.
    pub fn feed(&mut self, mut data: &[u8]) {
        self.total += data.len() as u64;

        while !data.is_empty() {
            let room = self.piece_length - self.buffered;
            let take = room.min(data.len() as u64) as usize;
            let (head, rest) = data.split_at(take);

            self.current.update(head);
            self.buffered += take as u64;
            data = rest;

            if self.buffered == self.piece_length {
                self.complete_piece();
            }
        }
    }

    /// Hashes any remaining bytes as a final short piece and returns every
    /// digest in stream order.
    ///
    /// The hasher is left empty; calling this again without feeding more data
    /// returns an empty list.
    pub fn finalize(&mut self) -> Vec<[u8; PIECE_HASH_LEN]> {
        if self.buffered > 0 {
            self.complete_piece();
        }
        self.total = 0;
        std::mem::take(&mut self.pieces)
    }

    /// Bytes fed since construction or the last [`finalize`](Self::finalize).
    pub fn bytes_hashed(&self) -> u64 {
        self.total
    }

    /// Number of full pieces completed so far.
    pub fn pieces_completed(&self) -> usize {
        self.pieces.len()
    }

    fn complete_piece(&mut self) {
        let digest = std::mem::take(&mut self.current).finalize();
        self.pieces.push(digest.into());
        self.buffered = 0;
    }
}
