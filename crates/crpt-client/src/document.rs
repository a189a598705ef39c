//! Document payload for goods introduction.
//!
//! Field names are fixed by the CRPT API. Everything is snake_case except
//! `description.participantInn`, which the API requires in camelCase.

use serde::{Deserialize, Serialize};

/// `doc_type` of a goods introduction document.
pub const DOC_TYPE_INTRODUCE_GOODS: &str = "LP_INTRODUCE_GOODS";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(rename = "participantInn")]
    pub participant_inn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub certificate_document: String,
    pub certificate_document_date: String,
    pub certificate_document_number: String,
    pub owner_inn: String,
    pub producer_inn: String,
    pub production_date: String,
    pub tnved_code: String,
    pub uit_code: String,
    pub uitu_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub description: Description,
    pub doc_id: String,
    pub doc_status: String,
    pub doc_type: String,
    #[serde(rename = "importRequest")]
    pub import_request: bool,
    pub owner_inn: String,
    pub participant_inn: String,
    pub producer_inn: String,
    pub production_date: String,
    pub production_type: String,
    pub products: Vec<Product>,
    pub reg_date: String,
    pub reg_number: String,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            description: Description::default(),
            doc_id: String::new(),
            doc_status: String::new(),
            doc_type: DOC_TYPE_INTRODUCE_GOODS.to_string(),
            import_request: false,
            owner_inn: String::new(),
            participant_inn: String::new(),
            producer_inn: String::new(),
            production_date: String::new(),
            production_type: String::new(),
            products: Vec::new(),
            reg_date: String::new(),
            reg_number: String::new(),
        }
    }
}

impl Document {
    /// Start a goods introduction document for `participant_inn`.
    ///
    /// The participant INN is written both to `description.participantInn` and
    /// to `participant_inn`.
    pub fn introduce_goods(participant_inn: impl Into<String>) -> Self {
        let participant_inn = participant_inn.into();
        Self {
            description: Description {
                participant_inn: participant_inn.clone(),
            },
            participant_inn,
            ..Default::default()
        }
    }

    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = doc_id.into();
        self
    }

    pub fn with_doc_status(mut self, doc_status: impl Into<String>) -> Self {
        self.doc_status = doc_status.into();
        self
    }

    pub fn with_import_request(mut self, import_request: bool) -> Self {
        self.import_request = import_request;
        self
    }

    pub fn with_owner_inn(mut self, owner_inn: impl Into<String>) -> Self {
        self.owner_inn = owner_inn.into();
        self
    }

    pub fn with_producer_inn(mut self, producer_inn: impl Into<String>) -> Self {
        self.producer_inn = producer_inn.into();
        self
    }

    pub fn with_production_date(mut self, production_date: impl Into<String>) -> Self {
        self.production_date = production_date.into();
        self
    }

    pub fn with_production_type(mut self, production_type: impl Into<String>) -> Self {
        self.production_type = production_type.into();
        self
    }

    pub fn with_reg_date(mut self, reg_date: impl Into<String>) -> Self {
        self.reg_date = reg_date.into();
        self
    }

    pub fn with_reg_number(mut self, reg_number: impl Into<String>) -> Self {
        self.reg_number = reg_number.into();
        self
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }
}

/// A document plus the caller-supplied signature sent in the `Signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    document: Document,
    signature: String,
}

impl SubmissionRequest {
    pub fn new(document: Document, signature: impl Into<String>) -> Self {
        Self {
            document,
            signature: signature.into(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            certificate_document: "certDoc".to_string(),
            certificate_document_date: "2020-01-23".to_string(),
            certificate_document_number: "certNumber".to_string(),
            owner_inn: "ownerInn".to_string(),
            producer_inn: "producerInn".to_string(),
            production_date: "2020-01-23".to_string(),
            tnved_code: "tnvedCode".to_string(),
            uit_code: "uitCode".to_string(),
            uitu_code: "uituCode".to_string(),
        }
    }

    fn sample_document() -> Document {
        Document::introduce_goods("participantInn")
            .with_doc_id("docId")
            .with_doc_status("docStatus")
            .with_import_request(true)
            .with_owner_inn("ownerInn")
            .with_producer_inn("producerInn")
            .with_production_date("2020-01-23")
            .with_production_type("productionType")
            .with_product(sample_product())
            .with_reg_date("2020-01-23")
            .with_reg_number("regNumber")
    }

    #[test]
    fn introduce_goods_fills_participant_and_type() {
        let doc = Document::introduce_goods("7700000000");
        assert_eq!(doc.description.participant_inn, "7700000000");
        assert_eq!(doc.participant_inn, "7700000000");
        assert_eq!(doc.doc_type, DOC_TYPE_INTRODUCE_GOODS);
        assert!(doc.products.is_empty());
    }

    #[test]
    fn default_document_has_constant_type() {
        assert_eq!(Document::default().doc_type, "LP_INTRODUCE_GOODS");
    }

    #[test]
    fn document_wire_format() {
        insta::assert_json_snapshot!(sample_document(), @r#"
        {
          "description": {
            "participantInn": "participantInn"
          },
          "doc_id": "docId",
          "doc_status": "docStatus",
          "doc_type": "LP_INTRODUCE_GOODS",
          "importRequest": true,
          "owner_inn": "ownerInn",
          "participant_inn": "participantInn",
          "producer_inn": "producerInn",
          "production_date": "2020-01-23",
          "production_type": "productionType",
          "products": [
            {
              "certificate_document": "certDoc",
              "certificate_document_date": "2020-01-23",
              "certificate_document_number": "certNumber",
              "owner_inn": "ownerInn",
              "producer_inn": "producerInn",
              "production_date": "2020-01-23",
              "tnved_code": "tnvedCode",
              "uit_code": "uitCode",
              "uitu_code": "uituCode"
            }
          ],
          "reg_date": "2020-01-23",
          "reg_number": "regNumber"
        }
        "#);
    }

    #[test]
    fn document_survives_json_round_trip() {
        let doc = sample_document();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"participantInn\":\"participantInn\""));
        assert!(!json.contains("participant_inn\":{"));

        let decoded: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn decodes_api_shaped_json() {
        let json = serde_json::json!({
            "description": {"participantInn": "123"},
            "doc_id": "d1",
            "doc_status": "DRAFT",
            "doc_type": "LP_INTRODUCE_GOODS",
            "importRequest": false,
            "owner_inn": "o",
            "participant_inn": "123",
            "producer_inn": "p",
            "production_date": "2024-05-01",
            "production_type": "OWN_PRODUCTION",
            "products": [],
            "reg_date": "2024-05-02",
            "reg_number": "r1"
        });

        let doc: Document = serde_json::from_value(json).unwrap();
        assert_eq!(doc.description.participant_inn, "123");
        assert!(!doc.import_request);
        assert_eq!(doc.production_type, "OWN_PRODUCTION");
    }

    #[test]
    fn snake_case_description_field_is_rejected() {
        let json = serde_json::json!({"participant_inn": "123"});
        assert!(serde_json::from_value::<Description>(json).is_err());
    }

    #[test]
    fn request_keeps_signature() {
        let request = SubmissionRequest::new(sample_document(), "c2lnbmF0dXJl");
        assert_eq!(request.signature(), "c2lnbmF0dXJl");
        assert_eq!(request.document().doc_id, "docId");
    }
}
