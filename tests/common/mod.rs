//! Synthetic BCFNT builder shared by the integration tests.

#![allow(dead_code)]

/// One CMAP segment to emit.
pub enum Segment {
    Direct { begin: u16, end: u16, base: u16 },
    Table { begin: u16, indices: Vec<u16> },
    Scan { pairs: Vec<(u16, u16)> },
}

/// Assembles a version-3 font in memory, with addresses written relative to
/// `base` and the blob starting at the first preamble byte.
pub struct FontBuilder {
    pub preamble: usize,
    pub base: u32,
    pub magic: [u8; 4],
    pub version: u32,
    pub sheet_format: u16,
    pub sheet_width: u16,
    pub sheet_height: u16,
    pub num_sheets: u16,
    pub widths: Vec<[u8; 3]>,
    pub segments: Vec<Segment>,
}

impl Default for FontBuilder {
    fn default() -> Self {
        Self {
            preamble: 0,
            base: 0x1800_0000,
            magic: *b"CFNT",
            version: 0x0300_0000,
            sheet_format: 11,
            sheet_width: 128,
            sheet_height: 64,
            num_sheets: 2,
            widths: vec![[0, 10, 12], [1, 11, 13], [2, 12, 14]],
            segments: vec![Segment::Direct {
                begin: 0x20,
                end: 0x22,
                base: 0,
            }],
        }
    }
}

fn u16le(b: &mut Vec<u8>, v: u16) {
    b.extend_from_slice(&v.to_le_bytes());
}

fn u32le(b: &mut Vec<u8>, v: u32) {
    b.extend_from_slice(&v.to_le_bytes());
}

fn pad4(b: &mut Vec<u8>, start: usize) {
    while (b.len() - start) % 4 != 0 {
        b.push(0);
    }
}

fn patch_u32(b: &mut [u8], at: usize, v: u32) {
    b[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

impl FontBuilder {
    /// Bytes of one sheet, assuming a 4-bit format.
    pub fn sheet_bytes(&self) -> usize {
        self.sheet_width as usize * self.sheet_height as usize / 2
    }

    /// Fill byte used for sheet `i`.
    pub fn sheet_fill(i: u16) -> u8 {
        0x10 + i as u8
    }

    pub fn build(&self) -> Vec<u8> {
        let mut b = vec![0u8; self.preamble];
        let addr = |pos: usize| self.base + pos as u32;

        let cfnt = b.len();
        b.extend_from_slice(&self.magic);
        u16le(&mut b, 0xFEFF);
        u16le(&mut b, 0x14);
        u32le(&mut b, self.version);
        u32le(&mut b, 0);
        u32le(&mut b, 3 + self.segments.len() as u32);

        let finf = b.len();
        b.extend_from_slice(b"FINF");
        u32le(&mut b, 0x20);
        b.extend_from_slice(&[1, 20]);
        u16le(&mut b, 0);
        b.extend_from_slice(&[0, 8, 9]);
        b.push(1);
        b.extend_from_slice(&[0; 12]);
        b.extend_from_slice(&[16, 16, 14, 0]);

        let tglp = b.len();
        b.extend_from_slice(b"TGLP");
        u32le(&mut b, 0x20);
        b.extend_from_slice(&[16, 16, 14, 16]);
        u32le(&mut b, self.sheet_bytes() as u32);
        u16le(&mut b, self.num_sheets);
        u16le(&mut b, self.sheet_format);
        u16le(&mut b, 8);
        u16le(&mut b, 4);
        u16le(&mut b, self.sheet_width);
        u16le(&mut b, self.sheet_height);
        let sheet_ptr = b.len();
        u32le(&mut b, 0);

        let cwdh = b.len();
        b.extend_from_slice(b"CWDH");
        let cwdh_size = b.len();
        u32le(&mut b, 0);
        u16le(&mut b, 0);
        u16le(&mut b, self.widths.len() as u16 - 1);
        u32le(&mut b, 0);
        for w in &self.widths {
            b.extend_from_slice(w);
        }
        pad4(&mut b, cwdh);
        let size = (b.len() - cwdh) as u32;
        patch_u32(&mut b, cwdh_size, size);

        let cmap = b.len();
        for (n, seg) in self.segments.iter().enumerate() {
            let start = b.len();
            let (begin, end, method) = match seg {
                Segment::Direct { begin, end, .. } => (*begin, *end, 0),
                Segment::Table { begin, indices } => {
                    (*begin, *begin + indices.len() as u16 - 1, 1)
                }
                Segment::Scan { .. } => (0x0000, 0xFFFF, 2),
            };
            b.extend_from_slice(b"CMAP");
            u32le(&mut b, 0);
            u16le(&mut b, begin);
            u16le(&mut b, end);
            u16le(&mut b, method);
            u16le(&mut b, 0);
            let next = b.len();
            u32le(&mut b, 0);
            match seg {
                Segment::Direct { base, .. } => u16le(&mut b, *base),
                Segment::Table { indices, .. } => {
                    for i in indices {
                        u16le(&mut b, *i);
                    }
                }
                Segment::Scan { pairs } => {
                    u16le(&mut b, pairs.len() as u16);
                    for (code, index) in pairs {
                        u16le(&mut b, *code);
                        u16le(&mut b, *index);
                    }
                }
            }
            pad4(&mut b, start);
            let size = (b.len() - start) as u32;
            patch_u32(&mut b, start + 4, size);
            if n + 1 < self.segments.len() {
                // Points at the next segment's data, past magic and size.
                let next_addr = addr(b.len() + 8);
                patch_u32(&mut b, next, next_addr);
            }
        }

        let sheets = b.len();
        for i in 0..self.num_sheets {
            b.extend(std::iter::repeat_n(Self::sheet_fill(i), self.sheet_bytes()));
        }

        patch_u32(&mut b, finf + 0x10, addr(tglp + 8));
        patch_u32(&mut b, finf + 0x14, addr(cwdh + 8));
        patch_u32(&mut b, finf + 0x18, addr(cmap + 8));
        patch_u32(&mut b, sheet_ptr, addr(sheets));
        let file_size = (b.len() - cfnt) as u32;
        patch_u32(&mut b, cfnt + 0x0C, file_size);
        b
    }
}
