//! Fixed print stylesheet: Letter page, 0.3in margins, compact Calibri/Arial body.

pub const RESUME_STYLESHEET: &str = r#"
@page { size: Letter; margin: 0.3in; }
body {
    font-family: 'Calibri', 'Arial', sans-serif;
    font-size: 12px;
    line-height: 1.2;
    margin: 0;
    padding: 0;
    color: #000;
    max-width: 100%;
}
h1 {
    text-align: center;
    margin: 0 0 2px 0;
    font-size: 24px;
    text-transform: uppercase;
    letter-spacing: 0.5px;
}
.contact-info {
    text-align: center;
    margin-bottom: 8px;
    display: flex;
    justify-content: center;
    gap: 4px;
}
.contact-info > *:not(:last-child)::after {
    content: "|";
    margin-left: 4px;
    font-size: 11px;
    color: #333;
}
h2 {
    text-transform: uppercase;
    border-bottom: 1px solid #000;
    margin: 0 0 4px 0;
    padding: 0;
    font-size: 14px;
    font-weight: bold;
}
.job-details, .project-details, .education-details { margin-bottom: 6px; }
.position-header {
    display: flex;
    justify-content: space-between;
    align-items: baseline;
    margin-bottom: 1px;
}
.company-name, .project-title { font-weight: bold; font-style: italic; }
.position-title, .degree, .date { font-style: italic; }
.date { white-space: nowrap; }
ul { margin: 0 0 4px 0; padding-left: 12px; }
li { margin-bottom: 0; line-height: 1.25; text-align: justify; }
a { color: #000; text-decoration: none; }
section { margin-bottom: 8px; }
"#;

/// Places the stylesheet just before `</head>`, or in front of the markup when there is
/// no head element.
pub fn inject_stylesheet(markup: &str) -> String {
    let style = format!("<style>{RESUME_STYLESHEET}</style>");
    match markup.find("</head>") {
        Some(at) => {
            let mut styled = String::with_capacity(markup.len() + style.len());
            styled.push_str(&markup[..at]);
            styled.push_str(&style);
            styled.push_str(&markup[at..]);
            styled
        }
        None => format!("{style}{markup}"),
    }
}
