use crate::store::Snapshot;
use std::collections::BTreeSet;
use std::fmt;

const PERSISTENT_ORGANIC_KEYWORDS: [&str; 10] = [
    "organic",
    "org",
    "carbon",
    "pcb",
    "dioxin",
    "furan",
    "chlorinated",
    "pesticide",
    "herbicide",
    "pollutant",
];

const COMMON_KEYWORDS: [&str; 32] = [
    "Lead",
    "Mercury",
    "Cadmium",
    "Chromium",
    "Nitrate",
    "Phosphate",
    "Chloroform",
    "1,1-Dichloro",
    "1,1,1,2 -TET",
    "1,3 -DICHLOR",
    "1122TetClEth",
    "11Cl-PF3OUdS",
    "11DClEthan",
    "12-DCA",
    "2,3,6-TBA",
    "2,4-D",
    "2,4-Xylenol",
    "2,4,6-T",
    "2,5-Xylenol",
    "245-T",
    "24Dichloropl",
    "2Phenoxyprop",
    "3:3 FTCA",
    "4-CAA",
    "4:2 FTSA",
    "4Cl3MePhenol",
    "4Phenoxbutyr",
    "5:3 FTCA",
    "6:2 FTSA",
    "7:3 FTCA",
    "8:2 FTSA",
    "9Cl-PF3ONS",
];

const LITTER_KEYWORDS: [&str; 3] = ["BWP", "SewageDebris", "TarryResidus"];

/// Keyword-based grouping of pollutants used to populate dashboard pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollutantCategory {
    /// Persistent organic pollutants, matched on label or definition
    PersistentOrganic,
    /// Frequently monitored metals, nutrients and solvents
    Common,
    /// Physical litter indicators
    Litter,
}

impl PollutantCategory {
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            PollutantCategory::PersistentOrganic => &PERSISTENT_ORGANIC_KEYWORDS,
            PollutantCategory::Common => &COMMON_KEYWORDS,
            PollutantCategory::Litter => &LITTER_KEYWORDS,
        }
    }

    /// Case-insensitive substring match; only persistent organics consult the definition
    pub fn matches(&self, label: &str, definition: &str) -> bool {
        let label = label.to_lowercase();
        let definition = match self {
            PollutantCategory::PersistentOrganic => definition.to_lowercase(),
            _ => String::new(),
        };

        self.keywords().iter().any(|keyword| {
            let keyword = keyword.to_lowercase();
            label.contains(&keyword) || (!definition.is_empty() && definition.contains(&keyword))
        })
    }

    /// Store pollutants in this category, judged against each pollutant's first definition
    pub fn pollutants_in(&self, snapshot: &Snapshot) -> BTreeSet<String> {
        snapshot
            .unique_pollutants()
            .into_iter()
            .filter(|pollutant| {
                self.matches(pollutant, snapshot.definition_for(pollutant).unwrap_or_default())
            })
            .collect()
    }
}

impl fmt::Display for PollutantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PollutantCategory::PersistentOrganic => "Persistent Organic Pollutants",
            PollutantCategory::Common => "Common Pollutants",
            PollutantCategory::Litter => "Environmental Litter",
        };
        write!(f, "{}", name)
    }
}

/// Title-case a material type label word by word, e.g. `SEA WATER` -> `Sea Water`
pub fn display_type_label(raw: &str) -> String {
    let mut label = String::with_capacity(raw.len());
    let mut capitalize = true;

    for ch in raw.to_lowercase().chars() {
        if capitalize {
            label.extend(ch.to_uppercase());
        } else {
            label.push(ch);
        }
        capitalize = ch == ' ';
    }

    label
}
