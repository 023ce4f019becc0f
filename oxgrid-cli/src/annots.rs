//! Annotation file reading. Each line is one reduced annotation tuple:
//! layer, color, sequence name, begin, end, and an optional ignored label.
//! Comment lines and malformed lines are skipped.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use oxgrid_core::io::open_alignment_file;
use oxgrid_core::Annot;

use crate::color::parse_color;

use std::io::BufRead;

fn annot_from_line(line: &str) -> Option<Annot> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 5 || line.starts_with('#') {
        return None;
    }
    Some(Annot {
        layer: fields[0].parse().ok()?,
        color: fields[1].to_string(),
        seq_name: fields[2].to_string(),
        beg: fields[3].parse().ok()?,
        end: fields[4].parse().ok()?,
    })
}

pub fn read_annot_files(file_names: &[PathBuf]) -> Result<Vec<Annot>> {
    let mut annots = Vec::new();
    for name in file_names {
        let reader = open_alignment_file(name)?;
        for line in reader.lines() {
            let line = line?;
            if let Some(a) = annot_from_line(&line) {
                parse_color(&a.color)
                    .map_err(|e| anyhow!("{}: {}", name.display(), e))?;
                annots.push(a);
            }
        }
    }
    Ok(annots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_tuples_and_skips_junk() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "# comment").unwrap();
        writeln!(f, "900 #fbf chr1 100 200 repeatA").unwrap();
        writeln!(f, "not an annotation").unwrap();
        writeln!(f, "20000 orange chr2 0 50").unwrap();
        let annots = read_annot_files(&[f.path().to_path_buf()]).unwrap();
        assert_eq!(annots.len(), 2);
        assert_eq!(annots[0].seq_name, "chr1");
        assert_eq!(annots[1].layer, 20000.0);
    }

    #[test]
    fn test_bad_color_is_an_error() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "900 nosuchcolor chr1 100 200").unwrap();
        assert!(read_annot_files(&[f.path().to_path_buf()]).is_err());
    }
}
