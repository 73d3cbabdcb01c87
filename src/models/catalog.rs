// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Static campus → department → program catalog behind the registration pickers.

use anyhow::{Result, anyhow};

/// Department with the programs it offers.
#[derive(Debug, PartialEq, Eq)]
pub struct Department {
    pub name: &'static str,
    pub programs: &'static [&'static str],
}

/// Campus (stored as the user's `college`) with its departments.
#[derive(Debug, PartialEq, Eq)]
pub struct Campus {
    pub name: &'static str,
    pub departments: &'static [Department],
}

const COMPUTER_SCIENCE: Department = Department {
    name: "Computer Science",
    programs: &["BCA", "BSc Computer Science", "MCA", "MSc Computer Science"],
};

const ENGINEERING: Department = Department {
    name: "Engineering",
    programs: &[
        "BTech Computer Science and Engineering",
        "BTech Electronics and Communication",
        "BTech Mechanical",
        "BTech Civil",
    ],
};

const COMMERCE: Department = Department {
    name: "Commerce",
    programs: &["BCom", "BCom Honours", "MCom"],
};

const MANAGEMENT: Department = Department {
    name: "Management",
    programs: &["BBA", "MBA"],
};

const SCIENCES: Department = Department {
    name: "Sciences",
    programs: &["BSc Physics", "BSc Chemistry", "BSc Mathematics"],
};

const HUMANITIES: Department = Department {
    name: "Humanities",
    programs: &["BA English", "BA Psychology", "BA Economics"],
};

const LAW: Department = Department {
    name: "Law",
    programs: &["BA LLB", "BBA LLB", "LLM"],
};

/// All campuses in picker order.
pub const CAMPUSES: &[Campus] = &[
    Campus {
        name: "Central Campus",
        departments: &[COMPUTER_SCIENCE, COMMERCE, SCIENCES, HUMANITIES, LAW],
    },
    Campus {
        name: "Kengeri Campus",
        departments: &[ENGINEERING, MANAGEMENT, SCIENCES],
    },
    Campus {
        name: "Bannerghatta Road Campus",
        departments: &[COMPUTER_SCIENCE, COMMERCE, MANAGEMENT],
    },
    Campus {
        name: "Yeshwanthpur Campus",
        departments: &[COMMERCE, MANAGEMENT, HUMANITIES],
    },
    Campus {
        name: "Delhi NCR Campus",
        departments: &[COMPUTER_SCIENCE, MANAGEMENT, LAW],
    },
];

pub fn campus(name: &str) -> Option<&'static Campus> {
    CAMPUSES.iter().find(|c| c.name == name)
}

/// Departments offered at a campus; empty for unknown campuses.
pub fn departments(campus_name: &str) -> &'static [Department] {
    campus(campus_name).map(|c| c.departments).unwrap_or(&[])
}

/// Programs of a department at a campus; empty when either is unknown.
pub fn programs(campus_name: &str, department: &str) -> &'static [&'static str] {
    departments(campus_name)
        .iter()
        .find(|d| d.name == department)
        .map(|d| d.programs)
        .unwrap_or(&[])
}

/// Check that the department belongs to the campus and the program to the department.
pub fn validate_affiliation(campus_name: &str, department: &str, program: &str) -> Result<()> {
    let campus = campus(campus_name).ok_or_else(|| anyhow!("Please select a campus."))?;
    let dept = campus
        .departments
        .iter()
        .find(|d| d.name == department)
        .ok_or_else(|| anyhow!("{department:?} is not offered at {}.", campus.name))?;
    if !dept.programs.contains(&program) {
        return Err(anyhow!("{program:?} is not a {} program.", dept.name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cascade_narrows_each_level() {
        let depts: Vec<_> = departments("Kengeri Campus").iter().map(|d| d.name).collect();
        assert_eq!(depts, vec!["Engineering", "Management", "Sciences"]);
        assert!(programs("Kengeri Campus", "Engineering").contains(&"BTech Civil"));
        assert!(programs("Kengeri Campus", "Law").is_empty());
    }

    #[test]
    fn unknown_campus_has_no_departments() {
        assert!(departments("Moon Campus").is_empty());
        assert!(programs("Moon Campus", "Computer Science").is_empty());
    }

    #[test]
    fn affiliation_must_follow_the_cascade() {
        assert!(validate_affiliation("Central Campus", "Computer Science", "BCA").is_ok());

        let err = validate_affiliation("Central Campus", "Engineering", "BTech Civil").unwrap_err();
        assert!(err.to_string().contains("not offered"));

        let err = validate_affiliation("Central Campus", "Commerce", "BCA").unwrap_err();
        assert!(err.to_string().contains("not a Commerce program"));

        assert!(validate_affiliation("", "Commerce", "BCom").is_err());
    }
}
