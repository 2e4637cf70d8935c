// Twitter API client: OAuth signing, timeline paging, tweet conversion.
//
// Each submodule handles one layer: request signing, the HTTP client, and
// the `TimelineReader` seam the digest pipeline depends on.

pub mod client;
pub mod oauth;
pub mod timeline;
