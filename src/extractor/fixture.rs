//! In-memory EPUB containers for extraction tests.

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

enum FixtureSection {
    Markup(String),
    NonLinear(String),
    Missing,
}

pub(crate) struct EpubFixture {
    title: Option<String>,
    author: Option<String>,
    cover: Option<(Vec<u8>, String)>,
    sections: Vec<FixtureSection>,
}

impl EpubFixture {
    pub(crate) fn new() -> Self {
        Self {
            title: Some("Fixture Book".to_string()),
            author: None,
            cover: None,
            sections: Vec::new(),
        }
    }

    pub(crate) fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub(crate) fn without_title(mut self) -> Self {
        self.title = None;
        self
    }

    pub(crate) fn author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    pub(crate) fn cover(mut self, bytes: &[u8], media_type: &str) -> Self {
        self.cover = Some((bytes.to_vec(), media_type.to_string()));
        self
    }

    /// Add a section whose `<body>` holds `body`.
    pub(crate) fn section(mut self, body: &str) -> Self {
        self.sections.push(FixtureSection::Markup(body.to_string()));
        self
    }

    /// Add a section whose spine entry is marked `linear="no"`.
    pub(crate) fn non_linear_section(mut self, body: &str) -> Self {
        self.sections.push(FixtureSection::NonLinear(body.to_string()));
        self
    }

    /// Add a spine entry whose file is absent from the archive.
    pub(crate) fn missing_section(mut self) -> Self {
        self.sections.push(FixtureSection::Missing);
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let mut write = |name: &str, bytes: &[u8]| {
            let stored =
                SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
            zip.start_file(name, stored).expect("start zip entry");
            zip.write_all(bytes).expect("write zip entry");
        };

        write("mimetype", b"application/epub+zip");
        write(
            "META-INF/container.xml",
            br#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#,
        );

        let mut manifest = String::new();
        let mut spine = String::new();
        for (idx, section) in self.sections.iter().enumerate() {
            manifest.push_str(&format!(
                "    <item id=\"s{idx}\" href=\"text/s{idx}.xhtml\" media-type=\"application/xhtml+xml\"/>\n"
            ));
            let linear = match section {
                FixtureSection::NonLinear(_) => " linear=\"no\"",
                _ => "",
            };
            spine.push_str(&format!("    <itemref idref=\"s{idx}\"{linear}/>\n"));
            if let FixtureSection::Markup(body) | FixtureSection::NonLinear(body) = section {
                write(&format!("OEBPS/text/s{idx}.xhtml"), xhtml(body).as_bytes());
            }
        }

        let mut metadata = String::from(
            "    <dc:identifier id=\"bookid\">urn:uuid:fixture</dc:identifier>\n    <dc:language>en</dc:language>\n",
        );
        if let Some(title) = &self.title {
            metadata.push_str(&format!("    <dc:title>{title}</dc:title>\n"));
        }
        if let Some(author) = &self.author {
            metadata.push_str(&format!("    <dc:creator>{author}</dc:creator>\n"));
        }
        if let Some((bytes, media_type)) = &self.cover {
            metadata.push_str("    <meta name=\"cover\" content=\"cover-image\"/>\n");
            manifest.push_str(&format!(
                "    <item id=\"cover-image\" href=\"images/cover.bin\" media-type=\"{media_type}\" properties=\"cover-image\"/>\n"
            ));
            write("OEBPS/images/cover.bin", bytes);
        }

        let opf = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="bookid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
{metadata}  </metadata>
  <manifest>
{manifest}  </manifest>
  <spine>
{spine}  </spine>
</package>"#
        );
        write("OEBPS/content.opf", opf.as_bytes());

        zip.finish().expect("finish zip").into_inner()
    }
}

fn xhtml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>section</title></head>
<body>
{body}
</body>
</html>"#
    )
}

/// `count` filler words ending in a full stop, so the first-line fallback
/// never mistakes the paragraph for a title.
pub(crate) fn paragraph(count: usize) -> String {
    let mut words: Vec<String> = (0..count).map(|idx| format!("word{idx}")).collect();
    if let Some(last) = words.last_mut() {
        last.push('.');
    }
    words.join(" ")
}
