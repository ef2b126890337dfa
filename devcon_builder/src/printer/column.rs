#[cfg(feature = "tracing_debug")]
use tracing::debug;

// Column widths are counted in characters, not bytes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PaddingWidth(usize);

impl PaddingWidth {
    pub(crate) fn new(width: usize) -> Result<Self, ()> {
        // padding must be at least 1
        if width >= 1 {
            Ok(PaddingWidth(width))
        } else {
            Err(())
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct LeftWidth(usize);

impl LeftWidth {
    pub(crate) fn new(width: usize) -> Result<Self, ()> {
        // left must be at least 1
        if width >= 1 {
            Ok(LeftWidth(width))
        } else {
            Err(())
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct MiddleWidth(usize);

impl MiddleWidth {
    pub(crate) fn new(width: usize) -> Result<Self, ()> {
        // middle must be at least 2 (so we can hyphenate)
        if width >= 2 {
            Ok(MiddleWidth(width))
        } else {
            Err(())
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RightWidth(usize);

impl RightWidth {
    pub(crate) fn new(width: usize) -> Result<Self, ()> {
        // right must be at least 1
        if width >= 1 {
            Ok(RightWidth(width))
        } else {
            Err(())
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TotalWidth(pub usize);

/// Lays out rows of `indent | left | middle | rights..`, wrapping only the middle column.
#[derive(Debug)]
pub(crate) struct ColumnRenderer {
    indent: usize,
    padding: PaddingWidth,
    left: LeftWidth,
    middle: MiddleWidth,
    rights: Vec<RightWidth>,
}

// Target 95% of the total width, so the renderer doesn't literally use the full line.
const TARGET_TOTAL_FACTOR: f64 = 0.95;

// Assuming an average word length of 5, 17 fits precisely 3 words with a space between them.
pub(crate) const MINIMUM_MIDDLE_WIDTH: usize = 17;

impl ColumnRenderer {
    /// Produce a renderer which fits the middle column into the total width where it can.
    /// The middle column never shrinks below [`MINIMUM_MIDDLE_WIDTH`].
    pub(crate) fn guided(
        indent: usize,
        padding: PaddingWidth,
        left: LeftWidth,
        middle: MiddleWidth,
        rights: Vec<RightWidth>,
        total_width: TotalWidth,
    ) -> Self {
        let mut non_middle = indent + left.0 + padding.0;

        if !rights.is_empty() {
            non_middle += padding.0
                + rights.iter().map(|r| r.0).sum::<usize>()
                + ((rights.len() - 1) * padding.0);
        }

        let target_total_width = (total_width.0 as f64 * TARGET_TOTAL_FACTOR) as usize;

        let selected = if middle.0 + non_middle <= target_total_width {
            middle.0
        } else if non_middle < target_total_width {
            std::cmp::max(target_total_width - non_middle, MINIMUM_MIDDLE_WIDTH)
        } else {
            MINIMUM_MIDDLE_WIDTH
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Columns {non_middle} within the total {total_width:?}.  Selecting middle: {selected}.");
        }

        Self::new(indent, padding, left, MiddleWidth(selected), rights)
    }

    pub(crate) fn new(
        indent: usize,
        padding: PaddingWidth,
        left: LeftWidth,
        middle: MiddleWidth,
        rights: Vec<RightWidth>,
    ) -> Self {
        Self {
            indent,
            padding,
            left,
            middle,
            rights,
        }
    }

    pub(crate) fn render(&self, left: &str, middle: &str, rights: &[String]) -> Vec<String> {
        assert!(rights.len() <= self.rights.len());
        let indent = self.indent;
        let padding = " ".repeat(self.padding.0);
        let left_width = self.left.0;
        let middle_width = self.middle.0;
        let right = rights
            .iter()
            .zip(self.rights.iter())
            .map(|(item, width)| format!("{item:w$}", w = width.0))
            .collect::<Vec<String>>()
            .join(&padding);
        let mut parts = chunk(middle, middle_width).into_iter();
        let first = parts.next().unwrap_or_default();
        let mut out = vec![format!(
            "{:indent$}{left:left_width$}{padding}{first:middle_width$}{padding}{right}",
            ""
        )];

        for part in parts {
            out.push(format!("{:indent$}{:left_width$}{padding}{part}", "", ""));
        }

        out.into_iter()
            .map(|line| line.trim_end().to_string())
            .collect()
    }
}

/// Split the paragraph into lines of at most `width` characters, hyphenating words that cannot fit on a line.
pub(crate) fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if current.chars().count() + word.chars().count() + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let characters: Vec<char> = word.chars().collect();
    let increment = width - 1;
    let mut left = 0;

    while characters.len() - left > width {
        let piece: String = characters[left..left + increment].iter().collect();
        lines.push(format!("{piece}-"));
        left += increment;
    }

    current.extend(&characters[left..]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn renderer(rights: Vec<usize>) -> ColumnRenderer {
        ColumnRenderer::new(
            0,
            PaddingWidth::new(4).unwrap(),
            LeftWidth::new(5).unwrap(),
            MiddleWidth::new(23).unwrap(),
            rights
                .into_iter()
                .map(|w| RightWidth::new(w).unwrap())
                .collect(),
        )
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    fn widths(#[case] width: usize, #[case] valid: bool) {
        assert_eq!(PaddingWidth::new(width).is_ok(), valid);
        assert_eq!(LeftWidth::new(width).is_ok(), valid);
        assert_eq!(RightWidth::new(width).is_ok(), valid);
        assert_eq!(MiddleWidth::new(width + 1).is_ok(), valid);
    }

    #[rstest]
    #[case("something", vec!["abc      something"])]
    #[case("  something  ", vec!["abc      something"])]
    #[case("something pieces full", vec!["abc      something pieces full"])]
    #[case("something pieces full more stuff", vec![
        "abc      something pieces full",
        "         more stuff",
    ])]
    #[case("something pieces fullest more stuff extra     ", vec![
        "abc      something pieces",
        "         fullest more stuff",
        "         extra",
    ])]
    #[case("", vec!["abc"])]
    fn render_simple(#[case] middle: &str, #[case] expected: Vec<&str>) {
        // Setup
        let cr = renderer(vec![]);

        // Execute
        let lines = cr.render("abc", middle, &[]);

        // Verify
        assert_eq!(lines, expected);
    }

    #[test]
    fn render_rights() {
        // Setup
        let cr = ColumnRenderer::new(
            2,
            PaddingWidth::new(4).unwrap(),
            LeftWidth::new(5).unwrap(),
            MiddleWidth::new(8).unwrap(),
            vec![RightWidth::new(5).unwrap(), RightWidth::new(2).unwrap()],
        );

        // Execute & verify
        assert_eq!(
            cr.render("abc", "my stuff", &["a".to_string(), "b".to_string()]),
            vec!["  abc      my stuff    a        b"]
        );
        assert_eq!(
            cr.render("abc12", "my stuff and some", &["abcde".to_string()]),
            vec!["  abc12    my stuff    abcde", "           and some"]
        );
        assert_eq!(
            cr.render("abc", "", &["a".to_string()]),
            vec!["  abc                  a"]
        );
    }

    #[test]
    fn render_middle_overflow() {
        // Setup
        let cr = renderer(vec![]);

        // Execute & verify
        assert_eq!(
            cr.render("abc", "somethingxpiecesxfuller", &[]),
            vec!["abc      somethingxpiecesxfuller"]
        );
        assert_eq!(
            cr.render(
                "abc",
                "somethingxpiecesxfullerandthenwecontinueforalongtime",
                &[]
            ),
            vec![
                "abc      somethingxpiecesxfulle-",
                "         randthenwecontinuefora-",
                "         longtime",
            ]
        );
        assert_eq!(
            cr.render(
                "abc",
                "something pieces fullerandthenwecontinueforalongtime",
                &[]
            ),
            vec![
                "abc      something pieces",
                "         fullerandthenwecontinu-",
                "         eforalongtime",
            ]
        );
    }

    #[test]
    fn render_unicode() {
        // Setup
        let cr = ColumnRenderer::new(
            0,
            PaddingWidth::new(1).unwrap(),
            LeftWidth::new(3).unwrap(),
            MiddleWidth::new(4).unwrap(),
            vec![],
        );

        // Execute & verify
        assert_eq!(cr.render("ü", "ääää öö", &[]), vec!["ü   ääää", "    öö"]);
    }

    #[rstest]
    #[case(120, 50)]
    #[case(40, 17)]
    #[case(20, MINIMUM_MIDDLE_WIDTH)]
    fn guided(#[case] total: usize, #[case] expected: usize) {
        // Execute
        let cr = ColumnRenderer::guided(
            4,
            PaddingWidth::new(8).unwrap(),
            LeftWidth::new(10).unwrap(),
            MiddleWidth::new(50).unwrap(),
            vec![],
            TotalWidth(total),
        );

        // Verify
        assert_eq!(cr.middle.0, expected);
    }

    #[rstest]
    #[case("", 5, vec![])]
    #[case("a b c", 5, vec!["a b c"])]
    #[case("a b c d", 5, vec!["a b c", "d"])]
    #[case("abcdefgh", 4, vec!["abc-", "def-", "gh"])]
    #[case("ab abcdefgh", 4, vec!["ab", "abc-", "def-", "gh"])]
    fn chunks(#[case] paragraph: &str, #[case] width: usize, #[case] expected: Vec<&str>) {
        assert_eq!(chunk(paragraph, width), expected);
    }
}
