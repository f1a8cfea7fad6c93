//! Company listing and selection.

use odx_client::{ClientError, ExecutionContext, Keyword, Params, ProxyClient};

use crate::models::Company;

/// Fetch every company visible to the configured user.
pub async fn list_companies(
    client: &ProxyClient,
    context: ExecutionContext,
) -> Result<Vec<Company>, ClientError> {
    let keyword = Keyword {
        context: Some(context),
        ..Keyword::default()
    };
    client
        .search_read("res.company", Params::empty(), keyword)
        .await
}

/// Mark companies whose ids appear in `selected`.
pub fn apply_selection(companies: &mut [Company], selected: &[i64]) {
    for company in companies {
        if selected.contains(&company.id) {
            company.selected = Some(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedTransport;

    #[tokio::test(flavor = "current_thread")]
    async fn list_companies_sends_an_empty_domain() {
        let transport = ScriptedTransport::new(vec![
            r#"{"result": [
                {"id": 1, "name": "Main Warehouse"},
                {"id": 2, "name": "Overflow Depot"}
            ]}"#,
        ]);
        let client = transport.configured_client();

        let companies = list_companies(&client, ExecutionContext::default())
            .await
            .unwrap();
        assert_eq!(companies.len(), 2);

        let body = transport.single_request();
        assert_eq!(body["model"], "res.company");
        assert_eq!(body["method"], "search_read");
        // no positional params, only the keyword block
        assert_eq!(body["params"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn apply_selection_marks_known_ids_only() {
        let mut companies = vec![
            Company {
                id: 1,
                name: "Main Warehouse".to_string(),
                selected: None,
            },
            Company {
                id: 2,
                name: "Overflow Depot".to_string(),
                selected: None,
            },
        ];
        apply_selection(&mut companies, &[2, 9]);
        assert_eq!(companies[0].selected, None);
        assert_eq!(companies[1].selected, Some(true));
    }
}
