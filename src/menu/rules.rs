use super::desktop_entry::AppInfo;

/// A matching rule from `<Include>` or `<Exclude>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// `<Filename>`: matches a desktop-file ID
    Filename(String),
    /// `<Category>`: matches entries listing the category
    Category(String),
    /// `<All/>`: matches everything
    All,
    /// `<And>`: matches when every child matches
    And(Vec<Rule>),
    /// `<Or>`: matches when any child matches
    Or(Vec<Rule>),
    /// `<Not>`: matches when no child matches
    Not(Vec<Rule>),
}

impl Rule {
    /// Evaluates the rule against an entry
    #[must_use]
    pub fn matches(&self, app: &AppInfo) -> bool {
        match self {
            Self::Filename(id) => app.desktop_file_id() == id,
            Self::Category(category) => app.categories().iter().any(|c| c == category),
            Self::All => true,
            Self::And(rules) => !rules.is_empty() && rules.iter().all(|r| r.matches(app)),
            Self::Or(rules) => rules.iter().any(|r| r.matches(app)),
            Self::Not(rules) => !rules.iter().any(|r| r.matches(app)),
        }
    }
}

/// An `<Include>` or `<Exclude>` block, evaluated in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuRule {
    /// Adds matching entries from the pool
    Include(Rule),
    /// Removes matching entries added so far
    Exclude(Rule),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn app(id: &str, categories: &str) -> AppInfo {
        let content = format!("[Desktop Entry]\nName={id}\nExec={id}\nCategories={categories}\n");
        AppInfo::parse(Path::new(id), id.to_string(), &content, &[]).unwrap()
    }

    #[test]
    fn test_filename_and_category() {
        let writer = app("writer.desktop", "Office;WordProcessor;");

        assert!(Rule::Filename("writer.desktop".into()).matches(&writer));
        assert!(!Rule::Filename("calc.desktop".into()).matches(&writer));
        assert!(Rule::Category("Office".into()).matches(&writer));
        assert!(!Rule::Category("Game".into()).matches(&writer));
    }

    #[test]
    fn test_boolean_combinators() {
        let writer = app("writer.desktop", "Office;WordProcessor;");
        let office = Rule::Category("Office".into());
        let game = Rule::Category("Game".into());

        assert!(Rule::Or(vec![game.clone(), office.clone()]).matches(&writer));
        assert!(!Rule::And(vec![game.clone(), office.clone()]).matches(&writer));
        assert!(Rule::And(vec![office.clone()]).matches(&writer));
        assert!(Rule::Not(vec![game.clone()]).matches(&writer));
        assert!(!Rule::Not(vec![game, office]).matches(&writer));
        assert!(Rule::All.matches(&writer));
    }

    #[test]
    fn test_empty_combinators() {
        let writer = app("writer.desktop", "Office;");

        assert!(!Rule::And(Vec::new()).matches(&writer));
        assert!(!Rule::Or(Vec::new()).matches(&writer));
        assert!(Rule::Not(Vec::new()).matches(&writer));
    }
}
