/// Arrow schema definitions for the historical case corpus.
pub mod corpus {
    use arrow::datatypes::{DataType, Field, Schema};

    pub const FORUM: &str = "forum";
    pub const CLAIM_TEXT: &str = "claim_text";
    pub const OUTCOME: &str = "outcome";
    pub const DECISION_TEXT: &str = "decision_text";

    /// Accepted spellings for each column, canonical name first.
    ///
    /// The Portuguese names are those of court jurisprudence exports.
    pub const COLUMN_ALIASES: &[(&str, &[&str])] = &[
        (FORUM, &["forum", "juizo"]),
        (CLAIM_TEXT, &["claim_text", "tese_juridica"]),
        (OUTCOME, &["outcome", "resultado"]),
        (DECISION_TEXT, &["decision_text", "texto_decisao"]),
    ];

    /// Schema for case corpus files. Nullable so that readers can report
    /// blank cells as row errors instead of failing the whole batch.
    pub fn case_schema() -> Schema {
        Schema::new(vec![
            Field::new(FORUM, DataType::Utf8, true),
            Field::new(CLAIM_TEXT, DataType::Utf8, true),
            Field::new(OUTCOME, DataType::Utf8, true),
            Field::new(DECISION_TEXT, DataType::Utf8, true),
        ])
    }

    /// Same field names as `schema`, every column typed as nullable Utf8.
    ///
    /// CSV type inference may guess numbers for short columns; corpus columns
    /// are always text.
    pub fn as_text_schema(schema: &Schema) -> Schema {
        Schema::new(
            schema
                .fields()
                .iter()
                .map(|f| Field::new(f.name(), DataType::Utf8, true))
                .collect::<Vec<_>>(),
        )
    }

    /// Find the index of a canonical column, trying each alias in order.
    pub fn resolve_column(schema: &Schema, canonical: &str) -> Option<usize> {
        let aliases = COLUMN_ALIASES
            .iter()
            .find(|(name, _)| *name == canonical)
            .map(|(_, aliases)| *aliases)?;
        aliases.iter().find_map(|alias| schema.index_of(alias).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::corpus;
    use arrow::datatypes::{DataType, Field, Schema};

    #[test]
    fn case_schema_has_expected_fields() {
        let schema = corpus::case_schema();
        assert_eq!(schema.fields().len(), 4);
        assert!(schema.field_with_name("claim_text").is_ok());
        assert!(schema.field_with_name("decision_text").is_ok());
    }

    #[test]
    fn resolves_portuguese_aliases() {
        let schema = Schema::new(vec![
            Field::new("juizo", DataType::Utf8, true),
            Field::new("tese_juridica", DataType::Utf8, true),
            Field::new("resultado", DataType::Utf8, true),
            Field::new("texto_decisao", DataType::Utf8, true),
        ]);
        assert_eq!(corpus::resolve_column(&schema, corpus::FORUM), Some(0));
        assert_eq!(corpus::resolve_column(&schema, corpus::OUTCOME), Some(2));
        assert_eq!(corpus::resolve_column(&schema, corpus::DECISION_TEXT), Some(3));
    }

    #[test]
    fn missing_column_resolves_to_none() {
        let schema = Schema::new(vec![Field::new("forum", DataType::Utf8, true)]);
        assert_eq!(corpus::resolve_column(&schema, corpus::CLAIM_TEXT), None);
        assert_eq!(corpus::resolve_column(&schema, "not_a_column"), None);
    }

    #[test]
    fn text_schema_forces_utf8() {
        let schema = Schema::new(vec![Field::new("forum", DataType::Int64, false)]);
        let text = corpus::as_text_schema(&schema);
        assert_eq!(text.field(0).data_type(), &DataType::Utf8);
        assert!(text.field(0).is_nullable());
    }
}
