//! Human-readable dump of a network: structure, CPTs, posteriors, evidence.

use std::fmt;

use crate::network::Network;

fn write_values(f: &mut fmt::Formatter<'_>, values: &[f64]) -> fmt::Result {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{v:.4}")?;
    }
    Ok(())
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Structure:")?;
        write!(f, "{}", self.graph)?;

        writeln!(f, "Conditional probability tables:")?;
        for (node, record) in self.records.iter().enumerate() {
            write!(f, "Node #{node}: ")?;
            match record.cpt() {
                Some(cpt) => {
                    for (row, values) in cpt.rows().enumerate() {
                        if row > 0 {
                            write!(f, " | ")?;
                        }
                        write_values(f, values)?;
                    }
                    writeln!(f)?;
                }
                None => writeln!(f, "<unassigned>")?,
            }
        }

        if self.is_session_active() {
            writeln!(f, "Posteriors:")?;
            for (node, record) in self.records.iter().enumerate() {
                write!(f, "Node #{node}: ")?;
                write_values(f, record.posterior())?;
                if let Some(state) = self.evidence.state_of(node) {
                    write!(f, " (observed {state})")?;
                }
                writeln!(f)?;
            }
        }

        write!(f, "Evidence: ")?;
        if self.evidence.is_empty() {
            writeln!(f, "none")?;
        } else {
            let pairs: Vec<String> = self
                .evidence
                .iter()
                .map(|(node, state)| format!("{node}={state}"))
                .collect();
            writeln!(f, "{}", pairs.join(", "))?;
        }
        Ok(())
    }
}
