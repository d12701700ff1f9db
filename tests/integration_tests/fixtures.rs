//! Test fixtures for integration tests
//!
//! Provides prospectus text and canned collaborator responses

/// Prospectus excerpt; with the default vocabulary it counts
/// revenue 3, growth 2, debt 1, profit 2, competitive 1, cash flow 1, risk 1
pub const PROSPECTUS_TEXT: &str = "\
Revenue from operations rose 40 percent. Revenue per order and platform revenue both improved.
Growth was led by quick commerce, and growth in tier-2 cities continued.
Total debt remains modest.
The company reported its first quarterly profit; profit margins widened.
The market remains highly competitive.
Operating cash flow turned positive.
Risk factors are described in the following section.
";

/// Same excerpt rendered as an HTML filing
pub const PROSPECTUS_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Draft Red Herring Prospectus</title>
    <style>.revenue { font-weight: bold; }</style>
</head>
<body>
    <h1>Summary of Financial Information</h1>
    <p>Revenue from operations rose 40 percent.</p>
    <script>var revenue = 0; var growth = 0;</script>
    <p>Growth was led by quick commerce.</p>
</body>
</html>
"#;

/// NewsAPI `/v2/everything` response
pub const NEWS_JSON: &str = r#"{
    "status": "ok",
    "totalResults": 3,
    "articles": [
        {"title": "Acme Foods IPO sees strong demand, shares surge on listing", "source": {"name": "Mint"}},
        {"title": "Analysts bullish as Acme Foods posts record profit"},
        {"title": "Acme Foods faces losses in new markets"}
    ]
}"#;

/// NewsAPI response without any articles
pub const NEWS_EMPTY_JSON: &str = r#"{"status": "ok", "totalResults": 0, "articles": []}"#;

/// Yahoo Finance `/v1/finance/search` response
pub const SEARCH_JSON: &str = r#"{
    "explains": [],
    "count": 2,
    "quotes": [
        {"exchange": "NSI", "shortname": "ACME FOODS", "quoteType": "EQUITY", "symbol": "ACMEFOODS.NS", "sector": "Consumer Cyclical"},
        {"exchange": "BSE", "shortname": "ACME FOODS", "quoteType": "EQUITY", "symbol": "543999.BO"}
    ]
}"#;

/// Yahoo search response with no matches
pub const SEARCH_EMPTY_JSON: &str = r#"{"explains": [], "count": 0, "quotes": []}"#;

/// Screener company page with ratios and a peer table
pub const SCREENER_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
  <div class="company-ratios">
    <ul id="top-ratios">
      <li class="flex flex-space-between">
        <span class="name">Market Cap</span>
        <span class="nowrap value">₹ <span class="number">80,000</span> Cr.</span>
      </li>
      <li class="flex flex-space-between">
        <span class="name">Current Price</span>
        <span class="nowrap value">₹ <span class="number">412</span></span>
      </li>
      <li class="flex flex-space-between">
        <span class="name">Stock P/E</span>
        <span class="nowrap value"><span class="number"></span></span>
      </li>
    </ul>
  </div>
  <section id="peers">
    <div class="responsive-holder">
      <table class="data-table">
        <thead>
          <tr><th>S.No.</th><th>Name</th><th>CMP Rs.</th><th>P/E</th><th>Mar Cap Rs.Cr.</th><th>Qtr Profit Var %</th></tr>
        </thead>
        <tbody>
          <tr><td>1.</td><td><a href="/company/ZOMATO/">Zomato Ltd</a></td><td>250.10</td><td>300.2</td><td>1,20,000.00</td><td>126.7</td></tr>
          <tr><td>2.</td><td><a href="/company/ACMEFOODS/">Acme Foods</a></td><td>412.00</td><td></td><td>80,000.00</td><td>-8.5</td></tr>
        </tbody>
      </table>
    </div>
  </section>
</body>
</html>
"#;
