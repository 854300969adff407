use crate::workflow::runner::SharedRunner;
use alertcore::alarm::AlarmCategory;
use alertcore::proximity::Incident;
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use warp::{http::StatusCode, Filter, Rejection, Reply};

pub fn bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug, Deserialize)]
struct StartRequest {
    category: AlarmCategory,
}

#[derive(Debug, Deserialize)]
struct VolumeRequest {
    volume: f32,
}

fn with_runner(
    runner: SharedRunner,
) -> impl Filter<Extract = (SharedRunner,), Error = Infallible> + Clone {
    warp::any().map(move || runner.clone())
}

/// HTTP surface over the shared runner: status reads plus the alarm and
/// monitoring controls a UI would invoke.
pub fn routes(
    runner: SharedRunner,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let status = warp::path!("status")
        .and(warp::get())
        .and(with_runner(runner.clone()))
        .and_then(|runner: SharedRunner| async move {
            let guard = runner.lock().await;
            Ok::<_, Infallible>(warp::reply::json(&guard.status()))
        });

    let session = warp::path!("session")
        .and(warp::get())
        .and(with_runner(runner.clone()))
        .and_then(|runner: SharedRunner| async move {
            let guard = runner.lock().await;
            Ok::<_, Infallible>(warp::reply::json(&guard.alarm().session()))
        });

    let feed = warp::path!("feed")
        .and(warp::get())
        .and(with_runner(runner.clone()))
        .and_then(|runner: SharedRunner| async move {
            let guard = runner.lock().await;
            Ok::<_, Infallible>(warp::reply::json(&guard.monitor().snapshot()))
        });

    let start = warp::path!("alarm" / "start")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_runner(runner.clone()))
        .and_then(|request: StartRequest, runner: SharedRunner| async move {
            let mut guard = runner.lock().await;
            guard.alarm_mut().start_category(request.category);
            Ok::<_, Infallible>(warp::reply::json(&guard.alarm().session()))
        });

    let stop = warp::path!("alarm" / "stop")
        .and(warp::post())
        .and(with_runner(runner.clone()))
        .and_then(|runner: SharedRunner| async move {
            let mut guard = runner.lock().await;
            guard.alarm_mut().stop();
            Ok::<_, Infallible>(warp::reply::json(&guard.alarm().session()))
        });

    let mute = warp::path!("alarm" / "mute")
        .and(warp::post())
        .and(with_runner(runner.clone()))
        .and_then(|runner: SharedRunner| async move {
            let mut guard = runner.lock().await;
            guard.alarm_mut().toggle_mute();
            Ok::<_, Infallible>(warp::reply::json(&guard.alarm().session()))
        });

    let volume = warp::path!("alarm" / "volume")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_runner(runner.clone()))
        .and_then(|request: VolumeRequest, runner: SharedRunner| async move {
            let mut guard = runner.lock().await;
            guard.alarm_mut().set_volume(request.volume);
            Ok::<_, Infallible>(warp::reply::json(&guard.alarm().session()))
        });

    let monitoring = warp::path!("monitoring" / "toggle")
        .and(warp::post())
        .and(with_runner(runner.clone()))
        .and_then(|runner: SharedRunner| async move {
            let mut guard = runner.lock().await;
            let monitoring = guard.monitor_mut().toggle_monitoring();
            Ok::<_, Infallible>(warp::reply::json(&json!({ "monitoring": monitoring })))
        });

    let clear = warp::path!("feed" / "clear")
        .and(warp::post())
        .and(with_runner(runner.clone()))
        .and_then(|runner: SharedRunner| async move {
            let mut guard = runner.lock().await;
            guard.monitor_mut().clear();
            Ok::<_, Infallible>(warp::reply::json(&guard.monitor().snapshot()))
        });

    let ingest = warp::path!("incidents")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_runner(runner))
        .and_then(|incident: Incident, runner: SharedRunner| async move {
            let mut guard = runner.lock().await;
            let (inserted, escalated) = guard.ingest(incident);
            let status = if inserted.is_some() {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            Ok::<_, Infallible>(warp::reply::with_status(
                warp::reply::json(&json!({
                    "inserted": inserted,
                    "escalated": escalated.map(|profile| profile.id),
                })),
                status,
            ))
        });

    status
        .or(session)
        .or(feed)
        .or(start)
        .or(stop)
        .or(mute)
        .or(volume)
        .or(monitoring)
        .or(clear)
        .or(ingest)
}
