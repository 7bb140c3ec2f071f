//! Tone digits rendered as superscripts.
//!
//! Every digit 1 to 9 is replaced in a single pass, so the replacement text
//! itself is never rewritten.

const UNICODE_DIGITS: [char; 9] = ['¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

fn map_digits(text: &str, render: impl Fn(char, &mut String)) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if matches!(c, '1'..='9') {
            render(c, &mut out);
        } else {
            out.push(c);
        }
    }
    out
}

/// Unicode superscript digits. Not every font carries all of them;
/// [`superscript_html`] is safer for browsers.
pub fn superscript_unicode(text: &str) -> String {
    map_digits(text, |d, out| {
        let idx = d as usize - '1' as usize;
        out.push(UNICODE_DIGITS[idx]);
    })
}

pub fn superscript_html(text: &str) -> String {
    map_digits(text, |d, out| {
        out.push_str("<sup>");
        out.push(d);
        out.push_str("</sup>");
    })
}

pub fn superscript_tex(text: &str) -> String {
    map_digits(text, |d, out| {
        out.push_str(r"\raisebox{-0.3ex}{$^");
        out.push(d);
        out.push_str(r"$}\hspace{0pt}");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unicode() {
        assert_eq!(superscript_unicode("jung1 man4"), "jung¹ man⁴");
        assert_eq!(superscript_unicode("0 9"), "0 ⁹");
    }

    #[test]
    fn test_html() {
        assert_eq!(
            superscript_html("jung1-man4 ho2"),
            "jung<sup>1</sup>-man<sup>4</sup> ho<sup>2</sup>"
        );
    }

    #[test]
    fn test_tex_replacement_is_not_rewritten() {
        assert_eq!(
            superscript_tex("si3"),
            r"si\raisebox{-0.3ex}{$^3$}\hspace{0pt}"
        );
        let two = superscript_tex("a3b0");
        assert_eq!(two.matches("raisebox").count(), 1);
        assert!(two.ends_with("b0"));
    }
}
