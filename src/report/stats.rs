//! Group membership statistics and their text renderings.

use std::collections::HashMap;

use crate::annotation::TestRecord;

/// Count and member list of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    pub name: String,
    pub count: usize,
    pub members: Vec<String>,
}

/// Per-group counts and memberships, in first-encountered order.
#[derive(Debug, Clone, Default)]
pub struct GroupStatistics {
    groups: Vec<GroupEntry>,
    index: HashMap<String, usize>,
    test_cases: usize,
}

impl GroupStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build statistics over a whole record set.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a TestRecord>) -> Self {
        let mut stats = Self::new();
        for record in records {
            stats.record(record);
        }
        stats
    }

    /// Count one record toward each group it lists.
    ///
    /// A group listed twice counts twice.
    pub fn record(&mut self, record: &TestRecord) {
        self.test_cases += 1;
        let member = record.membership_entry();

        for group in &record.groups {
            let idx = match self.index.get(group) {
                Some(&idx) => idx,
                None => {
                    self.groups.push(GroupEntry {
                        name: group.clone(),
                        count: 0,
                        members: Vec::new(),
                    });
                    self.index.insert(group.clone(), self.groups.len() - 1);
                    self.groups.len() - 1
                }
            };

            let entry = &mut self.groups[idx];
            entry.count += 1;
            entry.members.push(member.clone());
        }
    }

    /// Number of records seen.
    pub fn test_cases(&self) -> usize {
        self.test_cases
    }

    /// Number of distinct groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn get(&self, group: &str) -> Option<&GroupEntry> {
        self.index.get(group).map(|&idx| &self.groups[idx])
    }

    /// Groups by ascending count. Ties keep first-encountered order.
    pub fn by_ascending_count(&self) -> Vec<&GroupEntry> {
        let mut sorted: Vec<&GroupEntry> = self.groups.iter().collect();
        sorted.sort_by_key(|entry| entry.count);
        sorted
    }

    /// One `name<TAB>count` line per group, name padded to 30 and count to 5.
    pub fn render_histogram(&self) -> String {
        let mut out = String::new();
        for entry in self.by_ascending_count() {
            out.push_str(&format!("{:<30}\t{:>5}\n", entry.name, entry.count));
        }
        out
    }

    /// `name: count` headers followed by tab-indented members and a blank line.
    pub fn render_membership(&self) -> String {
        let mut out = String::new();
        for entry in self.by_ascending_count() {
            out.push_str(&format!("{}: {}\n", entry.name, entry.count));
            for member in &entry.members {
                out.push_str(&format!("\t{}\n", member));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(file: &str, line: usize, function: &str, groups: &[&str]) -> TestRecord {
        TestRecord {
            source_filename: file.to_string(),
            groups: groups.iter().map(|g| g.to_string()).collect(),
            marker_text: "@Test".to_string(),
            function_name: function.to_string(),
            line_number: line,
            package_name: String::new(),
            absolute_path: format!("/tests/{}", file),
        }
    }

    #[test]
    fn test_ascending_count_keeps_tie_order() {
        let records = vec![
            record("TCA.java", 1, "a1", &["beta", "gamma"]),
            record("TCA.java", 5, "a2", &["alpha", "gamma"]),
            record("TCB.java", 3, "b1", &["gamma", "beta"]),
            record("TCB.java", 9, "b2", &["gamma", "alpha"]),
            record("TCC.java", 2, "c1", &["gamma"]),
        ];
        let stats = GroupStatistics::from_records(&records);

        let order: Vec<(&str, usize)> = stats
            .by_ascending_count()
            .iter()
            .map(|e| (e.name.as_str(), e.count))
            .collect();
        assert_eq!(order, vec![("beta", 2), ("alpha", 2), ("gamma", 5)]);
        assert_eq!(stats.test_cases(), 5);
        assert_eq!(stats.group_count(), 3);
    }

    #[test]
    fn test_duplicate_group_counts_twice() {
        let stats = GroupStatistics::from_records(&[record("TCA.java", 1, "a", &["x", "x"])]);
        assert_eq!(stats.get("x").unwrap().count, 2);
        assert_eq!(stats.get("x").unwrap().members.len(), 2);
    }

    #[test]
    fn test_render_histogram() {
        let stats = GroupStatistics::from_records(&[
            record("TCA.java", 1, "a", &["smoke", "fast"]),
            record("TCA.java", 4, "b", &["smoke"]),
        ]);

        let expected = format!(
            "fast{}\t    1\nsmoke{}\t    2\n",
            " ".repeat(26),
            " ".repeat(25)
        );
        assert_eq!(stats.render_histogram(), expected);
    }

    #[test]
    fn test_render_membership_uses_line_after_marker() {
        let stats = GroupStatistics::from_records(&[
            record("TCLogin.java", 2, "testLogin", &["smoke", "fast"]),
            record("TCLogin.java", 7, "testLogout", &["smoke"]),
        ]);

        assert_eq!(
            stats.render_membership(),
            "fast: 1\n\tTCLogin.java:3 testLogin\n\n\
             smoke: 2\n\tTCLogin.java:3 testLogin\n\tTCLogin.java:8 testLogout\n\n"
        );
    }

    #[test]
    fn test_empty_statistics_render_nothing() {
        let stats = GroupStatistics::new();
        assert_eq!(stats.render_histogram(), "");
        assert_eq!(stats.render_membership(), "");
    }
}
