use regex::Regex;

/// Source checkout of an egg, as listed in `autocheckout-<env>.cfg`.
///
/// Lines follow the mr.developer sources format:
///
/// ```text
/// my.theme = git git@example.com:site/my.theme.git rev=release-2
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSpec {
    pub name: String,
    /// Version control kind, e.g. `git`
    pub kind: String,
    pub url: String,
    /// Branch, tag or commit to check out
    pub rev: String,
}

impl CheckoutSpec {
    /// Find the first checkout line for `egg` in a configuration text
    pub fn find(egg: &str, cfg: &str) -> Option<Self> {
        let pattern = format!(
            r"^\s*{}\s+=\s+(\S+)\s+(\S+)\s+rev=(.*)$",
            regex::escape(egg)
        );
        let re = Regex::new(&pattern).ok()?;

        cfg.lines().find_map(|line| {
            let caps = re.captures(line)?;
            let rev = caps[3].trim();
            if rev.is_empty() {
                return None;
            }

            Some(CheckoutSpec {
                name: egg.to_string(),
                kind: caps[1].to_string(),
                url: caps[2].to_string(),
                rev: rev.to_string(),
            })
        })
    }
}
