use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use warp::{
    http::{header, HeaderValue, StatusCode},
    hyper::Body,
    reply::Response,
    Filter, Rejection, Reply,
};

use crate::{
    downloader::Downloader,
    error::ExtractError,
    extract::{identifier, Identifier},
    page::{Extraction, PageResolver},
    status::{done, fail},
};

const FORM_LIMIT: u64 = 16 * 1024;

/// The single field the form submits.
#[derive(Clone, Debug, Deserialize)]
pub struct SourceRequest {
    #[serde(rename = "videoUrl")]
    pub video_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FetchPayload {
    Success {
        #[serde(rename = "mp4Urls")]
        mp4_urls: Vec<String>,
        #[serde(rename = "videoId")]
        video_id: String,
    },
    Failure {
        error: String,
    },
}

impl FetchPayload {
    fn from_outcome(outcome: &Result<Extraction, ExtractError>) -> (FetchPayload, StatusCode) {
        match outcome {
            Ok(extraction) => (
                FetchPayload::Success {
                    mp4_urls: extraction.candidates.clone(),
                    video_id: extraction.identifier.to_string(),
                },
                StatusCode::OK,
            ),
            Err(err) => (
                FetchPayload::Failure {
                    error: err.to_string(),
                },
                err.status_code(),
            ),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct DownloadQuery {
    pub url: String,
    #[serde(default)]
    pub id: String,
}

static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_template("index.html", include_str!("../templates/index.html"))
        .unwrap();
    tera
});

#[derive(Debug, Serialize)]
struct PageView {
    video_id: String,
    file_name: String,
    results: Vec<ResultView>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResultView {
    href: String,
    src: String,
}

pub fn routes(
    resolver: Arc<PageResolver>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let downloader = Arc::new(Downloader::new());
    let with_resolver = warp::any().map(move || resolver.clone());
    let with_downloader = warp::any().map(move || downloader.clone());
    let form = warp::body::content_length_limit(FORM_LIMIT).and(warp::body::form::<SourceRequest>());

    let index = warp::get()
        .and(warp::path::end())
        .map(|| page_reply(render_page(None), StatusCode::OK));

    let download = warp::get()
        .and(warp::path!("download"))
        .and(with_downloader)
        .and(warp::query::<DownloadQuery>())
        .and_then(download_video);

    let submit = warp::post()
        .and(warp::path::end())
        .and(with_resolver.clone())
        .and(form.clone())
        .and_then(submit_form);

    let api = warp::post()
        .and(warp::path!("api" / "extract"))
        .and(with_resolver)
        .and(form)
        .and_then(submit_json);

    index.or(download).or(submit).or(api)
}

pub async fn serve(addr: SocketAddr, resolver: PageResolver) {
    done(format!("Listening on http://{}", addr).as_str());
    warp::serve(routes(Arc::new(resolver))).run(addr).await;
}

async fn submit_form(
    resolver: Arc<PageResolver>,
    request: SourceRequest,
) -> Result<impl Reply, Infallible> {
    let outcome = resolver.resolve(&request.video_url).await;
    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(err) => err.status_code(),
    };
    Ok(page_reply(render_page(Some(&outcome)), status))
}

async fn submit_json(
    resolver: Arc<PageResolver>,
    request: SourceRequest,
) -> Result<impl Reply, Infallible> {
    let outcome = resolver.resolve(&request.video_url).await;
    let (payload, status) = FetchPayload::from_outcome(&outcome);
    Ok(warp::reply::with_status(warp::reply::json(&payload), status))
}

/// Relays a candidate url as an attachment named `{id}.mp4`.
async fn download_video(
    downloader: Arc<Downloader>,
    query: DownloadQuery,
) -> Result<Response, Infallible> {
    let upstream = match downloader.fetch(&query.url).await {
        Ok(upstream) => upstream,
        Err(err) => {
            fail(err.to_string().as_str());
            return Ok(
                warp::reply::with_status(err.to_string(), StatusCode::BAD_GATEWAY).into_response(),
            );
        }
    };
    let identifier = identifier::derive(&query.id);
    let content_length = upstream.content_length();
    let mut reply = Response::new(Body::wrap_stream(upstream.bytes_stream()));
    let headers = reply.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("video/mp4"));
    headers.insert(header::CONTENT_DISPOSITION, content_disposition(&identifier));
    if let Some(len) = content_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }
    Ok(reply)
}

fn content_disposition(identifier: &Identifier) -> HeaderValue {
    let file_name = identifier
        .file_name()
        .replace(|c: char| c == '"' || c == '\\', "");
    HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"video.mp4\""))
}

fn page_reply(
    page: Result<String, tera::Error>,
    status: StatusCode,
) -> warp::reply::WithStatus<warp::reply::Html<String>> {
    match page {
        Ok(html) => warp::reply::with_status(warp::reply::html(html), status),
        Err(err) => {
            fail(format!("Failed to render page: {}", err).as_str());
            warp::reply::with_status(
                warp::reply::html(String::from("Failed to render page")),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    }
}

fn render_page(outcome: Option<&Result<Extraction, ExtractError>>) -> Result<String, tera::Error> {
    let view = match outcome {
        Some(Ok(extraction)) => PageView {
            video_id: extraction.identifier.to_string(),
            file_name: extraction.identifier.file_name(),
            results: extraction
                .candidates
                .iter()
                .map(|url| ResultView {
                    href: format!(
                        "/download?url={}&id={}",
                        urlencoding::encode(url),
                        urlencoding::encode(extraction.identifier.as_str())
                    ),
                    src: url.clone(),
                })
                .collect(),
            error: None,
        },
        Some(Err(err)) => PageView {
            video_id: String::new(),
            file_name: String::new(),
            results: Vec::new(),
            error: Some(err.to_string()),
        },
        None => PageView {
            video_id: String::new(),
            file_name: String::new(),
            results: Vec::new(),
            error: None,
        },
    };
    TEMPLATES.render("index.html", &Context::from_serialize(&view)?)
}
