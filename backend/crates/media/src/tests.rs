//! Unit tests for media crate

#[cfg(test)]
mod support {
    use pow::{Challenge, Nonce};
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::domain::entities::{AuthContext, Job, JobStatus, Metadata};
    use crate::domain::gateway::{ConversionService, MetadataProvider, SearchProvider};
    use crate::domain::value_objects::MediaUrl;
    use crate::error::{MediaError, MediaResult};

    /// Scripted in-memory upstream with call counters
    #[derive(Clone, Default)]
    pub struct ScriptedUpstream {
        inner: Arc<Inner>,
    }

    #[derive(Default)]
    struct Inner {
        challenge: Mutex<Option<Challenge>>,
        reject_verify: Mutex<bool>,
        statuses: Mutex<VecDeque<Result<JobStatus, String>>>,
        status_delay: Mutex<Duration>,
        metadata_fails: Mutex<bool>,
        search_items: Mutex<Vec<Value>>,

        sessions: AtomicUsize,
        challenge_calls: AtomicUsize,
        verify_calls: AtomicUsize,
        status_calls: AtomicUsize,
        metadata_calls: AtomicUsize,
        search_calls: AtomicUsize,
        verified_nonce: Mutex<Option<Nonce>>,
        status_api_keys: Mutex<Vec<Option<String>>>,
        status_kinds: Mutex<Vec<String>>,
    }

    impl ScriptedUpstream {
        pub fn new() -> Self {
            let upstream = Self::default();
            upstream.set_challenge(Challenge::new("xyz", 2));
            upstream
        }

        pub fn set_challenge(&self, challenge: Challenge) {
            *self.inner.challenge.lock().unwrap() = Some(challenge);
        }

        pub fn reject_verify(&self) {
            *self.inner.reject_verify.lock().unwrap() = true;
        }

        pub fn fail_metadata(&self) {
            *self.inner.metadata_fails.lock().unwrap() = true;
        }

        pub fn set_status_delay(&self, delay: Duration) {
            *self.inner.status_delay.lock().unwrap() = delay;
        }

        pub fn set_search_items(&self, items: Vec<Value>) {
            *self.inner.search_items.lock().unwrap() = items;
        }

        pub fn push_status(&self, status: JobStatus) {
            self.inner.statuses.lock().unwrap().push_back(Ok(status));
        }

        pub fn push_transport_error(&self, message: &str) {
            self.inner
                .statuses
                .lock()
                .unwrap()
                .push_back(Err(message.to_string()));
        }

        pub fn sessions(&self) -> usize {
            self.inner.sessions.load(Ordering::SeqCst)
        }

        pub fn challenge_calls(&self) -> usize {
            self.inner.challenge_calls.load(Ordering::SeqCst)
        }

        pub fn verify_calls(&self) -> usize {
            self.inner.verify_calls.load(Ordering::SeqCst)
        }

        pub fn status_calls(&self) -> usize {
            self.inner.status_calls.load(Ordering::SeqCst)
        }

        pub fn metadata_calls(&self) -> usize {
            self.inner.metadata_calls.load(Ordering::SeqCst)
        }

        pub fn search_calls(&self) -> usize {
            self.inner.search_calls.load(Ordering::SeqCst)
        }

        pub fn verified_nonce(&self) -> Option<Nonce> {
            *self.inner.verified_nonce.lock().unwrap()
        }

        pub fn status_api_keys(&self) -> Vec<Option<String>> {
            self.inner.status_api_keys.lock().unwrap().clone()
        }

        pub fn status_kinds(&self) -> Vec<String> {
            self.inner.status_kinds.lock().unwrap().clone()
        }
    }

    impl ConversionService for ScriptedUpstream {
        type Session = usize;

        fn open_session(&self) -> MediaResult<usize> {
            Ok(self.inner.sessions.fetch_add(1, Ordering::SeqCst))
        }

        async fn request_challenge(&self, _session: &usize, _job: &Job) -> MediaResult<Challenge> {
            self.inner.challenge_calls.fetch_add(1, Ordering::SeqCst);
            self.inner
                .challenge
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| MediaError::authentication("no challenge scripted", None))
        }

        async fn verify_session(&self, _session: &usize, _job: &Job, nonce: Nonce) -> MediaResult<()> {
            self.inner.verify_calls.fetch_add(1, Ordering::SeqCst);
            *self.inner.verified_nonce.lock().unwrap() = Some(nonce);
            if *self.inner.reject_verify.lock().unwrap() {
                return Err(MediaError::authentication(
                    "verify rejected",
                    Some(json!({ "error": "bad nonce" })),
                ));
            }
            Ok(())
        }

        async fn query_status(&self, auth: &AuthContext<usize>, job: &Job) -> MediaResult<JobStatus> {
            self.inner.status_calls.fetch_add(1, Ordering::SeqCst);
            self.inner
                .status_api_keys
                .lock()
                .unwrap()
                .push(auth.api_key().map(str::to_string));
            self.inner
                .status_kinds
                .lock()
                .unwrap()
                .push(job.download_kind.as_str().to_string());

            let delay = *self.inner.status_delay.lock().unwrap();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let next = self.inner.statuses.lock().unwrap().pop_front();
            match next {
                Some(Ok(status)) => Ok(status),
                Some(Err(message)) => Err(MediaError::UpstreamUnavailable(message)),
                None => Ok(JobStatus::Processing { progress: None }),
            }
        }
    }

    impl MetadataProvider for ScriptedUpstream {
        async fn fetch_metadata(&self, url: &MediaUrl) -> MediaResult<Metadata> {
            self.inner.metadata_calls.fetch_add(1, Ordering::SeqCst);
            if *self.inner.metadata_fails.lock().unwrap() {
                return Err(MediaError::MetadataUnavailable("video unavailable".to_string()));
            }
            Ok(Metadata::from_value(json!({
                "title": "Song",
                "author_name": "Band",
                "url": url.as_str(),
            })))
        }
    }

    impl SearchProvider for ScriptedUpstream {
        async fn search_videos(&self, _query: &str) -> MediaResult<Vec<Value>> {
            self.inner.search_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.inner.search_items.lock().unwrap().clone())
        }
    }

    pub fn completed(file_url: &str) -> JobStatus {
        JobStatus::Completed {
            file_url: Some(file_url.to_string()),
        }
    }

    pub fn processing() -> JobStatus {
        JobStatus::Processing {
            progress: Some("10%".to_string()),
        }
    }
}

#[cfg(test)]
mod poll_tests {
    use super::support::*;
    use crate::application::config::MediaConfig;
    use crate::application::poll_job::PollJobUseCase;
    use crate::domain::entities::{AuthContext, Job, JobStatus};
    use crate::domain::value_objects::{DownloadKind, MediaUrl};
    use crate::error::MediaError;
    use pow::Nonce;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    fn config() -> MediaConfig {
        MediaConfig {
            converter_base_url: "https://svc.example".to_string(),
            ..MediaConfig::default()
        }
    }

    fn job() -> Job {
        Job::new(
            MediaUrl::parse(Some("https://youtu.be/abc")).unwrap(),
            DownloadKind::Audio,
        )
    }

    fn auth() -> AuthContext<usize> {
        AuthContext::proof_of_work(0, Nonce::new(98))
    }

    #[tokio::test(start_paused = true)]
    async fn test_completes_after_two_delays() {
        let upstream = ScriptedUpstream::new();
        upstream.push_status(processing());
        upstream.push_status(processing());
        upstream.push_status(completed("/f/1.mp3"));

        let poll = PollJobUseCase::new(Arc::new(upstream.clone()), Arc::new(config()));
        let mut job = job();
        let started = Instant::now();

        let url = poll.execute(&mut job, &auth()).await.unwrap();

        assert_eq!(url, "https://svc.example/f/1.mp3");
        assert_eq!(started.elapsed(), Duration::from_secs(4));
        assert_eq!(upstream.status_calls(), 3);
        assert_eq!(job.attempts_used, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_at_attempt_bound() {
        let upstream = ScriptedUpstream::new();

        let poll = PollJobUseCase::new(Arc::new(upstream.clone()), Arc::new(config()));
        let mut job = job();
        let started = Instant::now();

        let err = poll.execute(&mut job, &auth()).await.unwrap_err();

        assert!(matches!(err, MediaError::Timeout { attempts: 30 }));
        assert_eq!(upstream.status_calls(), 30);
        // no sleep after the final attempt
        assert_eq!(started.elapsed(), Duration::from_secs(58));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_stops_after_one_query() {
        let upstream = ScriptedUpstream::new();
        upstream.push_status(JobStatus::Failed {
            error: Some("bad codec".to_string()),
        });

        let poll = PollJobUseCase::new(Arc::new(upstream.clone()), Arc::new(config()));
        let started = Instant::now();

        let err = poll.execute(&mut job(), &auth()).await.unwrap_err();

        match err {
            MediaError::DownloadFailed(message) => assert_eq!(message, "bad codec"),
            other => panic!("expected DownloadFailed, got {other:?}"),
        }
        assert_eq!(upstream.status_calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_without_message() {
        let upstream = ScriptedUpstream::new();
        upstream.push_status(JobStatus::Failed { error: None });

        let poll = PollJobUseCase::new(Arc::new(upstream), Arc::new(config()));
        let err = poll.execute(&mut job(), &auth()).await.unwrap_err();

        assert!(matches!(err, MediaError::DownloadFailed(ref m) if m == "Conversion failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_without_file_url_fails() {
        let upstream = ScriptedUpstream::new();
        upstream.push_status(JobStatus::Completed { file_url: None });

        let poll = PollJobUseCase::new(Arc::new(upstream), Arc::new(config()));
        let err = poll.execute(&mut job(), &auth()).await.unwrap_err();

        assert!(matches!(err, MediaError::DownloadFailed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_status_keeps_polling() {
        let upstream = ScriptedUpstream::new();
        upstream.push_status(JobStatus::classify(Some("queued"), None, None, None));
        upstream.push_status(JobStatus::classify(None, None, None, None));
        upstream.push_status(completed("/f/2.mp4"));

        let poll = PollJobUseCase::new(Arc::new(upstream.clone()), Arc::new(config()));
        let url = poll.execute(&mut job(), &auth()).await.unwrap();

        assert_eq!(url, "https://svc.example/f/2.mp4");
        assert_eq!(upstream.status_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_aborts_immediately() {
        let upstream = ScriptedUpstream::new();
        upstream.push_status(processing());
        upstream.push_transport_error("connection reset");
        upstream.push_status(completed("/f/1.mp3"));

        let poll = PollJobUseCase::new(Arc::new(upstream.clone()), Arc::new(config()));
        let err = poll.execute(&mut job(), &auth()).await.unwrap_err();

        assert!(matches!(err, MediaError::UpstreamUnavailable(_)));
        assert_eq!(upstream.status_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wall_clock_budget_cuts_slow_polls() {
        let upstream = ScriptedUpstream::new();
        upstream.set_status_delay(Duration::from_secs(2));

        let poll = PollJobUseCase::new(Arc::new(upstream.clone()), Arc::new(config()));
        let mut job = job();
        let err = poll.execute(&mut job, &auth()).await.unwrap_err();

        // each attempt costs 2s query + 2s delay against a 60s budget
        assert!(matches!(err, MediaError::Timeout { attempts: 15 }));
        assert_eq!(upstream.status_calls(), 15);
    }

    #[tokio::test(start_paused = true)]
    async fn test_absolute_file_url_is_kept() {
        let upstream = ScriptedUpstream::new();
        upstream.push_status(completed("https://cdn.example/f/1.mp3"));

        let poll = PollJobUseCase::new(Arc::new(upstream), Arc::new(config()));
        let url = poll.execute(&mut job(), &auth()).await.unwrap();

        assert_eq!(url, "https://cdn.example/f/1.mp3");
    }
}

#[cfg(test)]
mod authenticate_tests {
    use super::support::*;
    use crate::application::authenticate::AuthenticateUseCase;
    use crate::domain::entities::{Admission, Job};
    use crate::domain::value_objects::{DownloadKind, MediaUrl};
    use crate::error::MediaError;
    use pow::{Challenge, Nonce, PowError, SolveChallengeUseCase, SolverConfig};
    use std::sync::Arc;

    fn authenticate(upstream: &ScriptedUpstream) -> AuthenticateUseCase<ScriptedUpstream> {
        AuthenticateUseCase::new(
            Arc::new(upstream.clone()),
            SolveChallengeUseCase::new(Arc::new(SolverConfig::with_max_nonce(1_000_000))),
        )
    }

    fn job() -> Job {
        Job::new(
            MediaUrl::parse(Some("https://youtu.be/abc")).unwrap(),
            DownloadKind::Audio,
        )
    }

    #[tokio::test]
    async fn test_premium_key_skips_handshake() {
        let upstream = ScriptedUpstream::new();

        let auth = authenticate(&upstream)
            .execute(&job(), Some("premium-1".to_string()))
            .await
            .unwrap();

        assert_eq!(auth.api_key(), Some("premium-1"));
        assert_eq!(upstream.challenge_calls(), 0);
        assert_eq!(upstream.verify_calls(), 0);
    }

    #[tokio::test]
    async fn test_pow_handshake_submits_solved_nonce() {
        let upstream = ScriptedUpstream::new();

        let auth = authenticate(&upstream).execute(&job(), None).await.unwrap();

        assert_eq!(auth.admission, Admission::ProofOfWork(Nonce::new(98)));
        assert_eq!(upstream.verified_nonce(), Some(Nonce::new(98)));
        assert_eq!(upstream.challenge_calls(), 1);
        assert_eq!(upstream.verify_calls(), 1);
        assert_eq!(upstream.sessions(), 1);
    }

    #[tokio::test]
    async fn test_empty_key_means_no_key() {
        let upstream = ScriptedUpstream::new();

        let auth = authenticate(&upstream)
            .execute(&job(), Some(String::new()))
            .await
            .unwrap();

        assert!(auth.api_key().is_none());
        assert_eq!(upstream.challenge_calls(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_difficulty_never_verifies() {
        let upstream = ScriptedUpstream::new();
        upstream.set_challenge(Challenge::new("xyz", 65));

        let err = authenticate(&upstream)
            .execute(&job(), None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MediaError::Pow(PowError::ExhaustedSearch { difficulty: 65, .. })
        ));
        assert!(err.is_authentication_failure());
        assert_eq!(upstream.verify_calls(), 0);
    }

    #[tokio::test]
    async fn test_verify_rejection_is_authentication_failure() {
        let upstream = ScriptedUpstream::new();
        upstream.reject_verify();

        let err = authenticate(&upstream)
            .execute(&job(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::AuthenticationFailed { .. }));
    }

    #[tokio::test]
    async fn test_each_request_gets_its_own_session() {
        let upstream = ScriptedUpstream::new();
        let authenticate = authenticate(&upstream);

        let first = authenticate.execute(&job(), None).await.unwrap();
        let second = authenticate.execute(&job(), None).await.unwrap();

        assert_ne!(first.session, second.session);
    }
}

#[cfg(test)]
mod resolve_tests {
    use super::support::*;
    use crate::application::config::MediaConfig;
    use crate::application::{ResolveMediaInput, ResolveMediaUseCase};
    use crate::domain::entities::JobStatus;
    use crate::domain::value_objects::{MediaKind, MediaUrl, RequestType};
    use crate::error::MediaError;
    use pow::{SolveChallengeUseCase, SolverConfig};
    use std::sync::Arc;

    fn resolver(upstream: &ScriptedUpstream) -> ResolveMediaUseCase<ScriptedUpstream, ScriptedUpstream> {
        let config = MediaConfig {
            converter_base_url: "https://svc.example".to_string(),
            ..MediaConfig::default()
        };
        ResolveMediaUseCase::new(
            Arc::new(upstream.clone()),
            Arc::new(upstream.clone()),
            SolveChallengeUseCase::new(Arc::new(SolverConfig::with_max_nonce(1_000_000))),
            Arc::new(config),
        )
    }

    fn input(request_type: &str) -> ResolveMediaInput {
        ResolveMediaInput {
            url: MediaUrl::parse(Some("https://youtu.be/abc")).unwrap(),
            request_type: RequestType::parse(Some(request_type)),
            quality: None,
            api_key: None,
        }
    }

    #[tokio::test]
    async fn test_metadata_request_never_authenticates() {
        let upstream = ScriptedUpstream::new();

        let result = resolver(&upstream).execute(input("metadata")).await.unwrap();

        assert!(result.download.is_none());
        assert_eq!(result.metadata.get("title").unwrap(), "Song");
        assert_eq!(upstream.sessions(), 0);
        assert_eq!(upstream.challenge_calls(), 0);
        assert_eq!(upstream.status_calls(), 0);
    }

    #[tokio::test]
    async fn test_metadata_failure_stops_before_download() {
        let upstream = ScriptedUpstream::new();
        upstream.fail_metadata();

        let failure = resolver(&upstream).execute(input("audio")).await.unwrap_err();

        assert!(matches!(failure.error, MediaError::MetadataUnavailable(_)));
        assert!(failure.metadata.is_none());
        assert_eq!(upstream.challenge_calls(), 0);
        assert_eq!(upstream.status_calls(), 0);
    }

    #[tokio::test]
    async fn test_audio_download() {
        let upstream = ScriptedUpstream::new();
        upstream.push_status(completed("/f/1.mp3"));

        let result = resolver(&upstream).execute(input("mp3")).await.unwrap();
        let download = result.download.unwrap();

        assert_eq!(download.url, "https://svc.example/f/1.mp3");
        assert_eq!(download.kind, MediaKind::Audio);
        assert!(download.status);
        assert_eq!(upstream.status_kinds(), vec!["audio"]);
    }

    #[tokio::test]
    async fn test_video_is_requested_as_merge() {
        let upstream = ScriptedUpstream::new();
        upstream.push_status(completed("/f/1.mp4"));

        let result = resolver(&upstream).execute(input("video")).await.unwrap();

        assert_eq!(result.download.unwrap().kind, MediaKind::Video);
        assert_eq!(upstream.status_kinds(), vec!["merge"]);
    }

    #[tokio::test]
    async fn test_premium_key_reaches_status_queries() {
        let upstream = ScriptedUpstream::new();
        upstream.push_status(completed("/f/1.mp3"));

        let mut input = input("audio");
        input.api_key = Some("premium-1".to_string());
        resolver(&upstream).execute(input).await.unwrap();

        assert_eq!(upstream.status_api_keys(), vec![Some("premium-1".to_string())]);
        assert_eq!(upstream.challenge_calls(), 0);
    }

    #[tokio::test]
    async fn test_download_failure_keeps_metadata() {
        let upstream = ScriptedUpstream::new();
        upstream.push_status(JobStatus::Failed {
            error: Some("bad codec".to_string()),
        });

        let failure = resolver(&upstream).execute(input("audio")).await.unwrap_err();

        assert!(matches!(failure.error, MediaError::DownloadFailed(_)));
        assert_eq!(failure.metadata.unwrap().get("title").unwrap(), "Song");
    }

    #[tokio::test]
    async fn test_authentication_failure_keeps_metadata() {
        let upstream = ScriptedUpstream::new();
        upstream.reject_verify();

        let failure = resolver(&upstream).execute(input("audio")).await.unwrap_err();

        assert!(failure.error.is_authentication_failure());
        assert!(failure.metadata.is_some());
        assert_eq!(upstream.status_calls(), 0);
    }
}

#[cfg(test)]
mod search_tests {
    use super::support::*;
    use crate::application::SearchVideosUseCase;
    use crate::error::MediaError;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_blank_query_is_rejected_locally() {
        let upstream = ScriptedUpstream::new();
        let search = SearchVideosUseCase::new(Arc::new(upstream.clone()));

        for query in [None, Some(""), Some("   ")] {
            let err = search.execute(query).await.unwrap_err();
            assert!(matches!(err, MediaError::Validation(ref m) if m == "Search query is required"));
        }
        assert_eq!(upstream.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_only_videos_are_kept() {
        let upstream = ScriptedUpstream::new();
        upstream.set_search_items(vec![
            json!({ "type": "video", "videoId": "a" }),
            json!({ "type": "playlist", "playlistId": "p" }),
            json!({ "type": "channel", "author": "c" }),
            json!({ "type": "video", "videoId": "b" }),
        ]);

        let videos = SearchVideosUseCase::new(Arc::new(upstream))
            .execute(Some("lofi"))
            .await
            .unwrap();

        let ids: Vec<_> = videos.iter().map(|v| v["videoId"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use platform::http::build_client;
    use pow::SolverConfig;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::support::*;
    use crate::application::config::MediaConfig;
    use crate::infra::http_upstream::HttpUpstream;
    use crate::infra::passthrough::HttpFileSource;
    use crate::presentation::router::{media_router, media_router_generic};

    fn config(server: &MockServer) -> MediaConfig {
        MediaConfig {
            converter_base_url: server.uri(),
            metadata_base_url: server.uri(),
            search_base_url: server.uri(),
            ..MediaConfig::default()
        }
    }

    fn http_app(server: &MockServer) -> Router {
        let config = config(server);
        let client = build_client(&config.http).unwrap();
        let upstream = HttpUpstream::new(client.clone(), std::sync::Arc::new(config.clone()));
        media_router(
            upstream,
            HttpFileSource::new(client),
            config,
            SolverConfig::with_max_nonce(1_000_000),
        )
    }

    fn scripted_app(upstream: ScriptedUpstream, config: MediaConfig) -> Router {
        let client = build_client(&config.http).unwrap();
        media_router_generic(
            upstream,
            HttpFileSource::new(client),
            config,
            SolverConfig::with_max_nonce(1_000_000),
        )
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn mount_oembed(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/oembed"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "title": "Song", "author_name": "Band" })),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_audio_end_to_end_with_pow() {
        let server = MockServer::start().await;
        mount_oembed(&server).await;

        Mock::given(method("POST"))
            .and(path("/challenge"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "challenge": "xyz", "difficulty": 2 })),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/verify"))
            .and(body_json(json!({ "url": "https://youtu.be/abc", "type": "audio", "nonce": "98" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/download"))
            .and(query_param("type", "audio"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "status": "completed", "fileUrl": "/f/1.mp3" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = http_app(&server)
            .oneshot(post_json(
                "/yt",
                json!({ "url": "https://youtu.be/abc", "type": "audio" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body,
            json!({
                "success": true,
                "data": {
                    "title": "Song",
                    "author_name": "Band",
                    "url": "https://youtu.be/abc",
                    "videoId": "abc",
                    "download": {
                        "status": true,
                        "url": format!("{}/f/1.mp3", server.uri()),
                        "message": "Download ready",
                        "kind": "audio"
                    }
                }
            })
        );
    }

    #[tokio::test]
    async fn test_metadata_request_is_flat() {
        let server = MockServer::start().await;
        mount_oembed(&server).await;

        Mock::given(method("POST"))
            .and(path("/challenge"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let response = http_app(&server)
            .oneshot(post_json(
                "/yt",
                json!({ "url": "https://youtu.be/abc", "type": "metadata" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["title"], "Song");
        assert!(body["data"].get("download").is_none());
    }

    #[tokio::test]
    async fn test_missing_url() {
        let app = scripted_app(ScriptedUpstream::new(), MediaConfig::default());

        let response = app.oneshot(post_json("/yt", json!({}))).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "success": false, "error": "URL is required" })
        );
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_upstream_call() {
        let upstream = ScriptedUpstream::new();
        let app = scripted_app(upstream.clone(), MediaConfig::default());

        let response = app
            .oneshot(post_json("/yt", json!({ "url": "https://vimeo.com/1" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Invalid YouTube URL");
        assert_eq!(upstream.metadata_calls(), 0);
    }

    #[tokio::test]
    async fn test_download_failure_returns_metadata_in_details() {
        let upstream = ScriptedUpstream::new();
        upstream.push_status(crate::domain::entities::JobStatus::Failed {
            error: Some("bad codec".to_string()),
        });
        let app = scripted_app(upstream, MediaConfig::default());

        let response = app
            .oneshot(post_json(
                "/yt",
                json!({ "url": "https://youtu.be/abc", "type": "audio" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Failed to download video/audio");
        assert_eq!(body["message"], "bad codec");
        assert_eq!(body["details"]["metadata"]["title"], "Song");
        assert!(body["details"].get("debug").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_does_not_cancel_polling() {
        let upstream = ScriptedUpstream::new();
        for _ in 0..3 {
            upstream.push_status(processing());
        }
        upstream.push_status(completed("/files/1.mp3"));
        let app = scripted_app(upstream.clone(), MediaConfig::default());

        let mut request = Box::pin(app.oneshot(post_json(
            "/yt",
            json!({ "url": "https://youtu.be/abc", "type": "audio" }),
        )));

        // Drive the request until polling has begun, then hang up.
        while upstream.status_calls() == 0 {
            tokio::select! {
                _ = &mut request => panic!("request finished before polling began"),
                _ = tokio::time::sleep(std::time::Duration::from_millis(10)) => {}
            }
        }
        drop(request);

        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        assert_eq!(upstream.status_calls(), 4);
    }

    #[tokio::test]
    async fn test_metadata_failure() {
        let upstream = ScriptedUpstream::new();
        upstream.fail_metadata();
        let app = scripted_app(upstream.clone(), MediaConfig::development());

        let response = app
            .oneshot(post_json(
                "/yt",
                json!({ "url": "https://youtu.be/abc", "type": "video" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to fetch video metadata");
        assert!(body["details"].get("metadata").is_none());
        assert!(body["details"]["debug"].is_string());
        assert_eq!(upstream.challenge_calls(), 0);
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let app = scripted_app(ScriptedUpstream::new(), MediaConfig::default());

        let response = app.clone().oneshot(get("/yt")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            json_body(response).await,
            json!({ "success": false, "error": "Method not allowed. Use POST method." })
        );

        let response = app
            .oneshot(post_json("/download", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            json_body(response).await["error"],
            "Method not allowed. Use GET method."
        );
    }

    #[tokio::test]
    async fn test_search_envelope_has_total() {
        let upstream = ScriptedUpstream::new();
        upstream.set_search_items(vec![
            json!({ "type": "video", "videoId": "a" }),
            json!({ "type": "channel", "author": "c" }),
        ]);
        let app = scripted_app(upstream, MediaConfig::default());

        let response = app
            .oneshot(post_json("/search", json!({ "query": "lofi" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "success": true, "data": [{ "type": "video", "videoId": "a" }], "total": 1 })
        );
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let app = scripted_app(ScriptedUpstream::new(), MediaConfig::default());

        let response = app
            .oneshot(post_json("/search", json!({ "query": "" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Search query is required");
    }

    #[tokio::test]
    async fn test_download_streams_with_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/f/1.mp3"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "audio/mpeg")
                    .set_body_bytes(b"ID3-bytes".to_vec()),
            )
            .mount(&server)
            .await;

        let file_url = format!("{}/f/1.mp3", server.uri());
        let uri = format!("/download?url={file_url}&filename=song.mp3");
        let response = http_app(&server).oneshot(get(&uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "audio/mpeg");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"song.mp3\""
        );
        assert_eq!(headers[header::CONTENT_LENGTH], "9");
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ID3-bytes");
    }

    #[tokio::test]
    async fn test_download_upstream_status_is_forwarded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let uri = format!("/download?url={}/missing", server.uri());
        let response = http_app(&server).oneshot(get(&uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({ "success": false, "error": "Failed to fetch file: Not Found" })
        );
    }

    #[tokio::test]
    async fn test_download_requires_url() {
        let app = scripted_app(ScriptedUpstream::new(), MediaConfig::default());

        let response = app.oneshot(get("/download")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Download URL is required");
    }

    #[tokio::test]
    async fn test_health() {
        let app = scripted_app(ScriptedUpstream::new(), MediaConfig::default());

        let response = app.oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "success": true, "data": { "status": "ok" } })
        );
    }
}
