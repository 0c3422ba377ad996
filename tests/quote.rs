#![allow(clippy::unwrap_used, reason = "Fine for tests")]

mod common;

use httpmock::{Method::GET, MockServer};
use permit2_swap::error::{Kind, Status};
use permit2_swap::quote::{Client, QuoteProvider};
use permit2_swap::types::U256;
use reqwest::StatusCode;
use secrecy::SecretString;
use serde_json::json;

use crate::common::{
    CALL_DATA, PERMIT2, TAKER, WETH, WSTETH, eip712, permit2_allowance, price_body, quote_body,
    swap_request,
};

fn client(server: &MockServer) -> anyhow::Result<Client> {
    Ok(Client::new(&server.base_url(), &SecretString::from("test-key"))?)
}

mod price {
    use super::*;

    #[tokio::test]
    async fn price_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/price")
                .header("Content-Type", "application/json")
                .header("0x-api-key", "test-key")
                .header("0x-version", "v2")
                .query_param("chainId", "534352")
                .query_param("sellToken", WETH.to_string())
                .query_param("buyToken", WSTETH.to_string())
                .query_param("sellAmount", "100000000000000000")
                .query_param("taker", TAKER.to_string());
            then.status(StatusCode::OK)
                .json_body(price_body(permit2_allowance()));
        });

        let response = client.price(&swap_request()).await?;

        assert!(response.liquidity_available);
        assert_eq!(response.allowance_spender(), Some(PERMIT2));
        assert_eq!(
            response.buy_amount,
            Some(U256::from(84_192_861_328_432_113_u64))
        );
        assert_eq!(response.sell_token, Some(WETH));
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn host_path_is_kept() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(
            &format!("{}/swap/permit2", server.base_url()),
            &SecretString::from("test-key"),
        )?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/swap/permit2/price");
            then.status(StatusCode::OK)
                .json_body(price_body(serde_json::Value::Null));
        });

        let response = client.price(&swap_request()).await?;

        assert_eq!(response.allowance_spender(), None);
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn bad_request_is_a_provider_error() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/price");
            then.status(StatusCode::BAD_REQUEST).json_body(json!({
                "name": "INPUT_INVALID",
                "message": "Validation Failed"
            }));
        });

        let err = client.price(&swap_request()).await.unwrap_err();

        assert_eq!(err.kind(), Kind::Provider);
        let status = err.downcast_ref::<Status>().unwrap();
        assert_eq!(status.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(status.path, "/price");
        assert!(status.message.contains("INPUT_INVALID"));
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_a_provider_error() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/price");
            then.status(StatusCode::OK).body("<html>gateway</html>");
        });

        let err = client.price(&swap_request()).await.unwrap_err();

        assert_eq!(err.kind(), Kind::Provider);
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn unreachable_host_is_a_provider_error() -> anyhow::Result<()> {
        let client = Client::new("http://127.0.0.1:1", &SecretString::from("test-key"))?;

        let err = client.price(&swap_request()).await.unwrap_err();

        assert_eq!(err.kind(), Kind::Provider);

        Ok(())
    }
}

mod quote {
    use super::*;

    #[tokio::test]
    async fn quote_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/quote")
                .header("0x-api-key", "test-key")
                .query_param("sellAmount", "100000000000000000");
            then.status(StatusCode::OK)
                .json_body(quote_body(Some(eip712()), Some(CALL_DATA)));
        });

        let provider: &dyn QuoteProvider = &client;
        let response = provider.quote(&swap_request()).await?;

        let typed_data = response.permit_typed_data().unwrap();
        assert_eq!(typed_data.primary_type, "PermitTransferFrom");
        assert_eq!(
            response.transaction.data.as_ref().map(|data| data.len()),
            Some(36)
        );
        assert_eq!(
            response.transaction.gas_price,
            Some(U256::from(49_000_000_u64))
        );
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn quote_without_transaction_is_a_provider_error() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/quote");
            then.status(StatusCode::OK)
                .json_body(json!({ "liquidityAvailable": false, "zid": "0x1" }));
        });

        let err = client.quote(&swap_request()).await.unwrap_err();

        assert_eq!(err.kind(), Kind::Provider);
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn hex_and_integer_amounts_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server)?;

        let mut body = quote_body(None, Some(CALL_DATA));
        body["transaction"]["gas"] = json!("0x46550");
        body["transaction"]["value"] = json!(0);

        let mock = server.mock(|when, then| {
            when.method(GET).path("/quote");
            then.status(StatusCode::OK).json_body(body);
        });

        let response = client.quote(&swap_request()).await?;

        assert_eq!(response.transaction.gas, Some(U256::from(288_080_u64)));
        assert_eq!(response.transaction.value, Some(U256::ZERO));
        assert!(response.permit_typed_data().is_none());
        mock.assert();

        Ok(())
    }
}
