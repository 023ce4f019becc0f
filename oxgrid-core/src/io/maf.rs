//! MAF input shape: within one record the first `s` line is the reference
//! sequence and the second is the query. Gap characters in the aligned text
//! split each alignment into gapless blocks.

use crate::types::{Block, Bp};

use super::AlignmentRecord;

/// One parsed `s` line, waiting to be paired.
#[derive(Debug, Clone)]
pub struct MafSeqLine {
    pub name: String,
    pub seq_len: Bp,
    pub aln_beg: Bp,
    pub text: String,
}

pub fn parse_seq_line(fields: &[&str]) -> Option<MafSeqLine> {
    if fields.len() < 7 {
        return None;
    }
    let mut aln_beg = fields[2].parse::<Bp>().ok()?;
    let span = fields[3].parse::<Bp>().ok()?;
    let mut seq_len = fields[5].parse::<Bp>().ok()?;
    if fields[4] == "-" {
        aln_beg -= seq_len;
    }
    let text = fields[6].to_string();
    let letters = text.bytes().filter(|&b| b != b'-').count() as Bp;
    if span < letters {
        // Protein coordinates: rescale to DNA units.
        aln_beg *= 3;
        seq_len *= 3;
    }
    Some(MafSeqLine {
        name: fields[1].to_string(),
        seq_len,
        aln_beg,
        text,
    })
}

/// Split two gapped aligned texts into gapless blocks.
fn gapless_blocks(mut beg1: Bp, mut beg2: Bp, text1: &str, text2: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut size: Bp = 0;
    let mut flush = |beg1: &mut Bp, beg2: &mut Bp, size: &mut Bp| {
        if *size > 0 {
            blocks.push(Block::new(*beg1, *beg2, *size));
            *beg1 += *size;
            *beg2 += *size;
            *size = 0;
        }
    };
    for (x, y) in text1.bytes().zip(text2.bytes()) {
        if x == b'-' {
            flush(&mut beg1, &mut beg2, &mut size);
            beg2 += 1;
        } else if y == b'-' {
            flush(&mut beg1, &mut beg2, &mut size);
            beg1 += 1;
        } else {
            size += 1;
        }
    }
    flush(&mut beg1, &mut beg2, &mut size);
    blocks
}

pub fn pair_records(first: MafSeqLine, second: MafSeqLine) -> AlignmentRecord {
    let blocks = gapless_blocks(first.aln_beg, second.aln_beg, &first.text, &second.text);
    AlignmentRecord {
        seq_name1: first.name,
        seq_len1: first.seq_len,
        seq_name2: second.name,
        seq_len2: second.seq_len,
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq_line(line: &str) -> MafSeqLine {
        let fields: Vec<&str> = line.split_whitespace().collect();
        parse_seq_line(&fields).unwrap()
    }

    #[test]
    fn test_gaps_split_blocks() {
        let a = seq_line("s ref 10 6 + 100 ACG-TAC");
        let b = seq_line("s qry 20 6 + 200 AC-GTAC");
        let r = pair_records(a, b);
        assert_eq!(r.seq_name1, "ref");
        assert_eq!(r.seq_name2, "qry");
        assert_eq!(
            r.blocks,
            vec![
                Block::new(10, 20, 2),
                Block::new(13, 23, 3),
            ]
        );
    }

    #[test]
    fn test_reverse_strand_rebased() {
        let s = seq_line("s qry 5 4 - 100 ACGT");
        assert_eq!(s.aln_beg, -95);
    }

    #[test]
    fn test_protein_coordinates_tripled() {
        let s = seq_line("s prot 10 4 + 50 ACGTACGTACGT");
        assert_eq!(s.aln_beg, 30);
        assert_eq!(s.seq_len, 150);
    }

    #[test]
    fn test_short_line_rejected() {
        let fields: Vec<&str> = "s ref 10 6 +".split_whitespace().collect();
        assert!(parse_seq_line(&fields).is_none());
    }
}
