//! Named character reference lookup.
//!
//! [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
//!
//! "Consume the maximum number of characters possible, where the consumed
//! characters are one of the identifiers in the first column of the named
//! character references table." The full table defines 2,231 entities; this
//! module carries the commonly used subset, including the legacy
//! no-semicolon forms, and matches greedily for the longest entry.

/// Entity names (without the leading `&`) and their replacements.
/// Legacy entries without a trailing semicolon must come after their
/// semicolon form so longest-match prefers the full entity.
static ENTITIES: &[(&str, &str)] = &[
    ("AElig;", "\u{00C6}"),
    ("AElig", "\u{00C6}"),
    ("AMP;", "&"),
    ("AMP", "&"),
    ("Aacute;", "\u{00C1}"),
    ("Acirc;", "\u{00C2}"),
    ("Agrave;", "\u{00C0}"),
    ("Alpha;", "\u{0391}"),
    ("Aring;", "\u{00C5}"),
    ("Atilde;", "\u{00C3}"),
    ("Auml;", "\u{00C4}"),
    ("Beta;", "\u{0392}"),
    ("COPY;", "\u{00A9}"),
    ("COPY", "\u{00A9}"),
    ("Ccedil;", "\u{00C7}"),
    ("Dagger;", "\u{2021}"),
    ("Delta;", "\u{0394}"),
    ("ETH;", "\u{00D0}"),
    ("Eacute;", "\u{00C9}"),
    ("Ecirc;", "\u{00CA}"),
    ("Egrave;", "\u{00C8}"),
    ("Epsilon;", "\u{0395}"),
    ("Euml;", "\u{00CB}"),
    ("GT;", ">"),
    ("GT", ">"),
    ("Gamma;", "\u{0393}"),
    ("Iacute;", "\u{00CD}"),
    ("Icirc;", "\u{00CE}"),
    ("Igrave;", "\u{00CC}"),
    ("Iuml;", "\u{00CF}"),
    ("LT;", "<"),
    ("LT", "<"),
    ("Lambda;", "\u{039B}"),
    ("Ntilde;", "\u{00D1}"),
    ("Oacute;", "\u{00D3}"),
    ("Ocirc;", "\u{00D4}"),
    ("Ograve;", "\u{00D2}"),
    ("Omega;", "\u{03A9}"),
    ("Oslash;", "\u{00D8}"),
    ("Otilde;", "\u{00D5}"),
    ("Ouml;", "\u{00D6}"),
    ("Phi;", "\u{03A6}"),
    ("Pi;", "\u{03A0}"),
    ("Prime;", "\u{2033}"),
    ("Psi;", "\u{03A8}"),
    ("QUOT;", "\""),
    ("QUOT", "\""),
    ("REG;", "\u{00AE}"),
    ("REG", "\u{00AE}"),
    ("Sigma;", "\u{03A3}"),
    ("THORN;", "\u{00DE}"),
    ("Theta;", "\u{0398}"),
    ("TRADE;", "\u{2122}"),
    ("Uacute;", "\u{00DA}"),
    ("Ucirc;", "\u{00DB}"),
    ("Ugrave;", "\u{00D9}"),
    ("Uuml;", "\u{00DC}"),
    ("Xi;", "\u{039E}"),
    ("Yacute;", "\u{00DD}"),
    ("Yuml;", "\u{0178}"),
    ("Zeta;", "\u{0396}"),
    ("aacute;", "\u{00E1}"),
    ("acirc;", "\u{00E2}"),
    ("aelig;", "\u{00E6}"),
    ("agrave;", "\u{00E0}"),
    ("alpha;", "\u{03B1}"),
    ("amp;", "&"),
    ("amp", "&"),
    ("apos;", "'"),
    ("aring;", "\u{00E5}"),
    ("asymp;", "\u{2248}"),
    ("atilde;", "\u{00E3}"),
    ("auml;", "\u{00E4}"),
    ("bdquo;", "\u{201E}"),
    ("beta;", "\u{03B2}"),
    ("brvbar;", "\u{00A6}"),
    ("bull;", "\u{2022}"),
    ("ccedil;", "\u{00E7}"),
    ("cedil;", "\u{00B8}"),
    ("cent;", "\u{00A2}"),
    ("cent", "\u{00A2}"),
    ("chi;", "\u{03C7}"),
    ("circ;", "\u{02C6}"),
    ("copy;", "\u{00A9}"),
    ("copy", "\u{00A9}"),
    ("curren;", "\u{00A4}"),
    ("dagger;", "\u{2020}"),
    ("darr;", "\u{2193}"),
    ("deg;", "\u{00B0}"),
    ("deg", "\u{00B0}"),
    ("delta;", "\u{03B4}"),
    ("divide;", "\u{00F7}"),
    ("divide", "\u{00F7}"),
    ("eacute;", "\u{00E9}"),
    ("ecirc;", "\u{00EA}"),
    ("egrave;", "\u{00E8}"),
    ("empty;", "\u{2205}"),
    ("emsp;", "\u{2003}"),
    ("ensp;", "\u{2002}"),
    ("epsilon;", "\u{03B5}"),
    ("equiv;", "\u{2261}"),
    ("eta;", "\u{03B7}"),
    ("eth;", "\u{00F0}"),
    ("euml;", "\u{00EB}"),
    ("euro;", "\u{20AC}"),
    ("fnof;", "\u{0192}"),
    ("frac12;", "\u{00BD}"),
    ("frac12", "\u{00BD}"),
    ("frac14;", "\u{00BC}"),
    ("frac14", "\u{00BC}"),
    ("frac34;", "\u{00BE}"),
    ("frac34", "\u{00BE}"),
    ("gamma;", "\u{03B3}"),
    ("ge;", "\u{2265}"),
    ("gt;", ">"),
    ("gt", ">"),
    ("harr;", "\u{2194}"),
    ("hearts;", "\u{2665}"),
    ("hellip;", "\u{2026}"),
    ("iacute;", "\u{00ED}"),
    ("icirc;", "\u{00EE}"),
    ("iexcl;", "\u{00A1}"),
    ("igrave;", "\u{00EC}"),
    ("infin;", "\u{221E}"),
    ("int;", "\u{222B}"),
    ("iota;", "\u{03B9}"),
    ("iquest;", "\u{00BF}"),
    ("iuml;", "\u{00EF}"),
    ("kappa;", "\u{03BA}"),
    ("lambda;", "\u{03BB}"),
    ("laquo;", "\u{00AB}"),
    ("laquo", "\u{00AB}"),
    ("larr;", "\u{2190}"),
    ("ldquo;", "\u{201C}"),
    ("le;", "\u{2264}"),
    ("lsaquo;", "\u{2039}"),
    ("lsquo;", "\u{2018}"),
    ("lt;", "<"),
    ("lt", "<"),
    ("macr;", "\u{00AF}"),
    ("mdash;", "\u{2014}"),
    ("micro;", "\u{00B5}"),
    ("middot;", "\u{00B7}"),
    ("middot", "\u{00B7}"),
    ("minus;", "\u{2212}"),
    ("mu;", "\u{03BC}"),
    ("nabla;", "\u{2207}"),
    ("nbsp;", "\u{00A0}"),
    ("nbsp", "\u{00A0}"),
    ("ndash;", "\u{2013}"),
    ("ne;", "\u{2260}"),
    ("not;", "\u{00AC}"),
    ("not", "\u{00AC}"),
    ("ntilde;", "\u{00F1}"),
    ("nu;", "\u{03BD}"),
    ("oacute;", "\u{00F3}"),
    ("ocirc;", "\u{00F4}"),
    ("oelig;", "\u{0153}"),
    ("ograve;", "\u{00F2}"),
    ("oline;", "\u{203E}"),
    ("omega;", "\u{03C9}"),
    ("ordf;", "\u{00AA}"),
    ("ordm;", "\u{00BA}"),
    ("oslash;", "\u{00F8}"),
    ("otilde;", "\u{00F5}"),
    ("ouml;", "\u{00F6}"),
    ("para;", "\u{00B6}"),
    ("para", "\u{00B6}"),
    ("permil;", "\u{2030}"),
    ("phi;", "\u{03C6}"),
    ("pi;", "\u{03C0}"),
    ("plusmn;", "\u{00B1}"),
    ("plusmn", "\u{00B1}"),
    ("pound;", "\u{00A3}"),
    ("pound", "\u{00A3}"),
    ("prime;", "\u{2032}"),
    ("prod;", "\u{220F}"),
    ("psi;", "\u{03C8}"),
    ("quot;", "\""),
    ("quot", "\""),
    ("radic;", "\u{221A}"),
    ("raquo;", "\u{00BB}"),
    ("raquo", "\u{00BB}"),
    ("rarr;", "\u{2192}"),
    ("rdquo;", "\u{201D}"),
    ("reg;", "\u{00AE}"),
    ("reg", "\u{00AE}"),
    ("rho;", "\u{03C1}"),
    ("rsaquo;", "\u{203A}"),
    ("rsquo;", "\u{2019}"),
    ("sect;", "\u{00A7}"),
    ("sect", "\u{00A7}"),
    ("shy;", "\u{00AD}"),
    ("shy", "\u{00AD}"),
    ("sigma;", "\u{03C3}"),
    ("sum;", "\u{2211}"),
    ("sup1;", "\u{00B9}"),
    ("sup1", "\u{00B9}"),
    ("sup2;", "\u{00B2}"),
    ("sup2", "\u{00B2}"),
    ("sup3;", "\u{00B3}"),
    ("sup3", "\u{00B3}"),
    ("szlig;", "\u{00DF}"),
    ("tau;", "\u{03C4}"),
    ("theta;", "\u{03B8}"),
    ("thinsp;", "\u{2009}"),
    ("thorn;", "\u{00FE}"),
    ("tilde;", "\u{02DC}"),
    ("times;", "\u{00D7}"),
    ("times", "\u{00D7}"),
    ("trade;", "\u{2122}"),
    ("uacute;", "\u{00FA}"),
    ("uarr;", "\u{2191}"),
    ("ucirc;", "\u{00FB}"),
    ("ugrave;", "\u{00F9}"),
    ("uml;", "\u{00A8}"),
    ("uml", "\u{00A8}"),
    ("upsilon;", "\u{03C5}"),
    ("uuml;", "\u{00FC}"),
    ("xi;", "\u{03BE}"),
    ("yacute;", "\u{00FD}"),
    ("yen;", "\u{00A5}"),
    ("yen", "\u{00A5}"),
    ("yuml;", "\u{00FF}"),
    ("zeta;", "\u{03B6}"),
    ("zwj;", "\u{200D}"),
    ("zwnj;", "\u{200C}"),
];

/// The longest entity name in the table, in characters. The tokenizer uses
/// this as its lookahead bound when input arrives in chunks.
pub const MAX_ENTITY_LEN: usize = 8;

/// Find the longest entity that is a prefix of `candidate`.
///
/// Returns the matched name (without the `&`) and its replacement string.
/// Matching is case-sensitive, per the spec table.
#[must_use]
pub fn longest_match(candidate: &str) -> Option<(&'static str, &'static str)> {
    let mut best: Option<(&'static str, &'static str)> = None;
    for &(name, replacement) in ENTITIES {
        if candidate.starts_with(name) && best.is_none_or(|(b, _)| name.len() > b.len()) {
            best = Some((name, replacement));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_len_covers_table() {
        let longest = ENTITIES.iter().map(|(n, _)| n.chars().count()).max();
        assert_eq!(longest, Some(MAX_ENTITY_LEN));
    }

    #[test]
    fn prefers_semicolon_form() {
        assert_eq!(longest_match("amp;x"), Some(("amp;", "&")));
        assert_eq!(longest_match("ampx"), Some(("amp", "&")));
    }

    #[test]
    fn unknown_name_misses() {
        assert_eq!(longest_match("qqq;"), None);
    }
}
