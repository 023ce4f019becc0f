//! PSL (wide tabular) input shape: >20 whitespace-separated fields with a
//! strand field and comma-separated block begin/size lists.
//!
//! The target side becomes the first axis and the query side the second.
//! Translated-DNA alignments (psl produced by blat -t=dnax etc.) are
//! detected per side and rescaled to nucleotide units.

use crate::types::{Block, Bp};

use super::{aa_to_nt_factors, comma_separated_ints, AlignmentRecord};

struct PslSide {
    name: String,
    seq_len: Bp,
    block_begs: Vec<Bp>,
    is_translated: bool,
}

fn parse_side(
    is_reverse: bool,
    name: &str,
    seq_len: &str,
    aln_beg: &str,
    aln_end: &str,
    block_begs: &str,
    block_lens: &[Bp],
) -> Option<PslSide> {
    let seq_len = seq_len.parse::<Bp>().ok()?;
    let mut block_begs = comma_separated_ints(block_begs)?;
    let end = if is_reverse {
        // Reverse strand: negated coordinate space of equal magnitude.
        for b in &mut block_begs {
            *b -= seq_len;
        }
        -aln_beg.parse::<Bp>().ok()?
    } else {
        aln_end.parse::<Bp>().ok()?
    };
    // Translated coordinates cover fewer aligned bases than the declared span.
    let is_translated = *block_begs.last()? + *block_lens.last()? < end;
    Some(PslSide {
        name: name.to_string(),
        seq_len,
        block_begs,
        is_translated,
    })
}

pub fn parse_line(fields: &[&str]) -> Option<AlignmentRecord> {
    let strand = fields[8];
    let qry_reverse = strand.starts_with('-');
    let ref_reverse = strand.chars().nth(1) == Some('-');

    let sizes = comma_separated_ints(fields[18])?;
    let side1 = parse_side(
        ref_reverse,
        fields[13],
        fields[14],
        fields[15],
        fields[16],
        fields[20],
        &sizes,
    )?;
    let side2 = parse_side(
        qry_reverse,
        fields[9],
        fields[10],
        fields[11],
        fields[12],
        fields[19],
        &sizes,
    )?;

    let (size_mul, mul1, mul2) = aa_to_nt_factors(side1.is_translated, side2.is_translated);
    let blocks = side1
        .block_begs
        .iter()
        .zip(&side2.block_begs)
        .zip(&sizes)
        .map(|((&b1, &b2), &size)| Block::new(b1 * mul1, b2 * mul2, size * size_mul))
        .collect();

    Some(AlignmentRecord {
        seq_name1: side1.name,
        seq_len1: side1.seq_len * mul1,
        seq_name2: side2.name,
        seq_len2: side2.seq_len * mul2,
        blocks,
    })
}
