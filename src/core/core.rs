use log::{info, warn};

use super::{
    analysis::{FailureAnalysis, FailureAnalyzer, FailureReport, OllamaProvider},
    api_client::{Acknowledgement, ApiClient, Cart},
    authenticator::Authenticator,
    common::{token_preview, transport::ApiOutcome},
    configuration::Configuration,
};

/// ### Session diagnostic
/// Logs in with the configured credentials and prints what the session
/// carries: token, cookie and the `Cookie` header the next call will send.
/// ## Arguments
/// * `conf` - The configuration object
/// * `show_token` - Whether to print the full token
pub async fn session_diagnostic(
    conf: &Configuration,
    show_token: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let client = login(conf).await?;
    let session = client.session();

    let token = if show_token {
        session.token().to_string()
    } else {
        token_preview(session.token())
    };

    println!("BASE_URL: {}", session.base_url());
    println!("USERNAME: {}", session.username());
    println!("SESSION_TOKEN: {token}");
    println!(
        "COOKIE: {} (domain: {}, path: {})",
        session.cookie().name,
        session.cookie().domain,
        session.cookie().path
    );

    if session.cookie_header().is_none() {
        warn!("no cookie would be sent on the next request");
    }

    Ok(())
}

/// ### Show cart
/// Prints the cart as the server currently holds it.
pub async fn show_cart(conf: &Configuration) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let client = login(conf).await?;
    print_cart(client.get_cart().await?);
    Ok(())
}

/// ### Add to cart
/// Forwards the request as given, prints the server's verdict, then reads
/// the cart back since the mutation answer does not describe the cart.
pub async fn add_to_cart(
    conf: &Configuration,
    product_id: i64,
    quantity: i64,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let client = login(conf).await?;

    print_acknowledgement(client.add_to_cart(product_id, quantity).await?);
    print_cart(client.get_cart().await?);

    Ok(())
}

/// ### Remove from cart
/// `cart_id` is the line identifier shown by the cart command.
pub async fn remove_from_cart(
    conf: &Configuration,
    cart_id: i64,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let client = login(conf).await?;

    print_acknowledgement(client.remove_from_cart(cart_id).await?);
    print_cart(client.get_cart().await?);

    Ok(())
}

pub async fn clear_cart(conf: &Configuration) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let client = login(conf).await?;
    print_cart(client.clear_cart().await?);
    Ok(())
}

pub async fn show_order(
    conf: &Configuration,
    order_id: i64,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let client = login(conf).await?;

    match client.get_order(order_id).await? {
        ApiOutcome::Success(order) => println!("{}", serde_json::to_string_pretty(&order.0)?),
        ApiOutcome::Rejected(e) => println!("{e}"),
    }

    Ok(())
}

/// ### Failure analysis
/// Returns `None` when analysis is disabled. A model that cannot be reached
/// is not an error: the analysis then carries the failure reason.
pub async fn analyze_failure(
    conf: &Configuration,
    report: &FailureReport,
) -> Result<Option<FailureAnalysis>, Box<dyn std::error::Error + Send + Sync>> {
    if !conf.analysis_enabled() {
        info!("AI failure analysis disabled");
        return Ok(None);
    }

    info!("AI failure analysis enabled (Ollama: {})", conf.ollama_host());

    let provider = OllamaProvider::new(conf.ollama_host(), conf.model(), conf.analysis_timeout())?;
    let analyzer = FailureAnalyzer::new(Box::new(provider));

    Ok(Some(analyzer.analyze(report).await))
}

async fn login(conf: &Configuration) -> Result<ApiClient, Box<dyn std::error::Error + Send + Sync>> {
    let authenticator = Authenticator::new(
        conf.base_url()?,
        conf.credentials()?,
        conf.session_cookie(),
        conf.http_settings(),
    );

    authenticator.login().await
}

fn print_acknowledgement(outcome: ApiOutcome<Acknowledgement>) {
    match outcome {
        ApiOutcome::Success(ack) => println!("OK: {}", ack.message()),
        ApiOutcome::Rejected(e) => println!("{e}"),
    }
}

fn print_cart(outcome: ApiOutcome<Cart>) {
    match outcome {
        ApiOutcome::Success(cart) => print!("{}", render_cart(&cart)),
        ApiOutcome::Rejected(e) => println!("{e}"),
    }
}

pub fn render_cart(cart: &Cart) -> String {
    let mut out = String::new();

    if cart.is_empty() {
        out.push_str("cart is empty\n");
    }

    for line in &cart.products {
        let cart_id = line
            .cart_id
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        out.push_str(&format!(
            "[{}] product {} {} x{} {}\n",
            cart_id,
            line.product_id,
            line.name.as_deref().unwrap_or("-"),
            line.quantity,
            line.total.as_deref().unwrap_or_default(),
        ));
    }

    for total in &cart.totals {
        out.push_str(&format!("{}: {}\n", total.title, total.text));
    }

    out.push_str(&format!("shipping required: {}\n", cart.shipping_required));

    out
}
