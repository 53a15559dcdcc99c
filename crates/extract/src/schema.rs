use serde::{Deserialize, Serialize};

/// One extracted legal provision: a named offence, the chapter and
/// section it appears under, and the prescribed punishment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactTuple {
    pub offence: String,
    pub chapter: String,
    pub section: String,
    pub punishment: String,
}

impl FactTuple {
    /// Render as a single pipe-delimited record, the same convention the
    /// extraction prompt asks the model for and the backup file uses.
    pub fn to_line(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.offence, self.chapter, self.section, self.punishment
        )
    }
}

/// Parse free-form model output into fact tuples.
///
/// Convention: one provision per line, four fields separated by `|`.
/// Lines that do not split into exactly four non-empty fields are
/// ignored, as is the `NONE` sentinel a chunk without provisions yields.
pub fn parse_tuples(raw: &str) -> Vec<FactTuple> {
    let mut tuples = Vec::new();

    for line in raw.lines() {
        let line = line.trim().trim_start_matches(['-', '*']).trim();

        if line.is_empty() || line.eq_ignore_ascii_case("none") {
            continue;
        }

        let fields: Vec<&str> = line.split('|').map(str::trim).collect();
        if fields.len() != 4 || fields.iter().any(|f| f.is_empty()) {
            continue;
        }

        tuples.push(FactTuple {
            offence: fields[0].to_string(),
            chapter: fields[1].to_string(),
            section: fields[2].to_string(),
            punishment: fields[3].to_string(),
        });
    }

    tuples
}
