/// A docutils-style document: sections `c` to `w` nested under a titled
/// root, each section carrying its name and an upper-case title.
pub const DOCUMENT: &str = concat!(
    r#"<document ids="a" names="a">"#,
    r#"<title>A</title>"#,
    r#"<subtitle names="b">B</subtitle>"#,
    r#"<section names="c"><title>C</title><!-- a comment --></section>"#,
    r#"<section names="d"><title>D</title></section>"#,
    r#"<section names="e"><title>E</title>"#,
    r#"<section names="f"><title>F</title>"#,
    r#"<section names="g"><title>G</title></section>"#,
    r#"</section>"#,
    r#"<section names="h"><title>H</title></section>"#,
    r#"<section names="i"><title>I</title>"#,
    r#"<section names="j"><title>J</title></section>"#,
    r#"<section names="k"><title>K</title>"#,
    r#"<section names="l"><title>L</title></section>"#,
    r#"<section names="m"><title>M</title></section>"#,
    r#"</section>"#,
    r#"<section names="n"><title>N</title></section>"#,
    r#"<section names="o"><title>O</title></section>"#,
    r#"<section names="p"><title>P</title>"#,
    r#"<section names="q"><title>Q</title></section>"#,
    r#"<section names="r"><title>R</title></section>"#,
    r#"</section>"#,
    r#"</section>"#,
    r#"<section names="s"><title>S</title></section>"#,
    r#"<section names="t"><title>T</title>"#,
    r#"<section names="u"><title>U</title></section>"#,
    r#"</section>"#,
    r#"</section>"#,
    r#"<section names="v"><title>V</title></section>"#,
    r#"<section names="w"><title>W</title></section>"#,
    r#"</document>"#,
);

/// Every section name, in document order.
pub const ALL_SECTIONS: [&str; 21] = [
    "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s", "t", "u",
    "v", "w",
];
