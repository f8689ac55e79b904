//! Unit tests for diagram decoding across the supported file formats.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use schema2script::diagram::{decode, inflate_payload, is_raster_image, DecodeError, PayloadStage};
use schema2script::pipeline::schema_from_bytes;
use test_data_gen::{compress_payload, DiagramBuilder, Format};

fn sample_diagram() -> DiagramBuilder {
    let mut diagram = DiagramBuilder::new();
    let users = diagram.table("users");
    let id = diagram.pk_field(users, "id:Integer");
    diagram.field(users, "name:Varchar(80)");
    let orders = diagram.table("orders");
    diagram.pk_field(orders, "id:Integer");
    let user_id = diagram.field(orders, "user_id:Integer");
    diagram.relation(id, user_id);
    diagram
}

mod format_tests {
    use super::*;

    #[test]
    fn test_every_format_yields_same_model() {
        let diagram = sample_diagram();
        let plain = decode(diagram.render(Format::Plain).as_bytes(), "er.xml").unwrap();

        for format in [Format::MxFile, Format::Compressed, Format::Svg] {
            let text = diagram.render(format);
            let hint = format!("er.{}", format.extension());
            let doc = decode(text.as_bytes(), &hint).unwrap();
            assert_eq!(doc.nodes(), plain.nodes(), "format {:?}", format);
        }
    }

    #[test]
    fn test_decode_is_deterministic() {
        let text = sample_diagram().render(Format::Compressed);
        let (a, _) = schema_from_bytes(text.as_bytes(), "er.drawio").unwrap();
        let (b, _) = schema_from_bytes(text.as_bytes(), "er.drawio").unwrap();
        assert_eq!(a.tables, b.tables);
    }

    #[test]
    fn test_uncompressed_mxfile_first_diagram_wins() {
        let first = sample_diagram().to_model_xml();
        let text = format!(
            "<mxfile><diagram id=\"a\">{}</diagram><diagram id=\"b\"><mxGraphModel><root/></mxGraphModel></diagram></mxfile>",
            first
        );
        let doc = decode(text.as_bytes(), "er.drawio").unwrap();
        assert!(doc.node("c0").is_some());
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let text = format!("\u{feff}{}", sample_diagram().to_model_xml());
        assert!(decode(text.as_bytes(), "er.xml").is_ok());
    }
}

mod payload_tests {
    use super::*;

    #[test]
    fn test_inflate_round_trip() {
        let xml = "<mxGraphModel><root><mxCell id=\"0\" value=\"a+b c%\"/></root></mxGraphModel>";
        assert_eq!(inflate_payload(&compress_payload(xml)).unwrap(), xml);
    }

    #[test]
    fn test_payload_whitespace_is_ignored() {
        let payload = compress_payload("<mxGraphModel/>");
        let (head, tail) = payload.split_at(payload.len() / 2);
        let wrapped = format!("  {}\n  {}\n", head, tail);
        assert_eq!(inflate_payload(&wrapped).unwrap(), "<mxGraphModel/>");
    }

    #[test]
    fn test_truncated_base64_is_fatal() {
        let mut payload = compress_payload(&sample_diagram().to_model_xml());
        while payload.len() % 4 == 0 {
            payload.pop();
        }
        let text = format!("<mxfile><diagram>{}</diagram></mxfile>", payload);

        let err = decode(text.as_bytes(), "er.drawio").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Payload {
                stage: PayloadStage::Base64,
                ..
            }
        ));
    }

    #[test]
    fn test_not_deflate_data_is_fatal() {
        let payload = STANDARD.encode(b"not deflate data");
        let text = format!("<mxfile><diagram>{}</diagram></mxfile>", payload);
        let err = decode(text.as_bytes(), "er.drawio").unwrap_err();
        assert!(matches!(err, DecodeError::Payload { .. }));
    }
}

mod rejection_tests {
    use super::*;

    #[test]
    fn test_png_is_unsupported() {
        let bytes = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        assert!(is_raster_image(bytes, "er"));
        assert!(matches!(
            decode(bytes, "er").unwrap_err(),
            DecodeError::UnsupportedFormat(_)
        ));

        let xml = sample_diagram().to_model_xml();
        assert!(matches!(
            decode(xml.as_bytes(), "export.PNG").unwrap_err(),
            DecodeError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_svg_without_content() {
        let text = r#"<svg xmlns="http://www.w3.org/2000/svg"><g/></svg>"#;
        assert!(matches!(
            decode(text.as_bytes(), "er.svg").unwrap_err(),
            DecodeError::MissingEmbeddedSource
        ));
    }

    #[test]
    fn test_unrecognized_document() {
        let text = "<html><body>not a diagram</body></html>";
        assert!(matches!(
            decode(text.as_bytes(), "er.xml").unwrap_err(),
            DecodeError::NotRecognized
        ));
    }

    #[test]
    fn test_malformed_xml() {
        let text = "<mxGraphModel><root></mxGraphModel>";
        assert!(matches!(
            decode(text.as_bytes(), "er.xml").unwrap_err(),
            DecodeError::Xml(_)
        ));
    }
}
