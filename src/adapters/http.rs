//! HTTP adapter — the request-handler Event Source.
//!
//! | Route         | Effect                 | Body                                   |
//! |---------------|------------------------|----------------------------------------|
//! | `GET /`       | none                   | minimal HTML page with the current mode |
//! | `GET /toggle` | flips the LED mode     | `On` / `Off` (post-toggle)             |
//! | `GET /state`  | none                   | `{"led":"On","connected":true,"ip":"a.b.c.d"}` |
//!
//! Handlers only touch [`ControlState`] and [`LinkStatus`]; the level
//! follower and fader pick up a toggle on their next poll.  Body
//! rendering is target-independent so it is tested on the host.

use core::fmt::Write as _;

use serde::Serialize;

use crate::app::sources::ToggleEndpoint;
use crate::state::{ControlState, GuardedCell, LinkStatus, Mode};

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    http::{
        Method,
        server::{Configuration, EspHttpServer},
    },
    io::Write,
};
#[cfg(target_os = "espidf")]
use log::info;

#[derive(Debug, Serialize)]
struct StateView {
    led: &'static str,
    connected: bool,
    ip: heapless::String<15>,
}

fn dotted(ip: [u8; 4]) -> heapless::String<15> {
    let mut s = heapless::String::new();
    // 4 × "255" + 3 dots = 15, always fits.
    let _ = write!(s, "{}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3]);
    s
}

/// `GET /` body.
pub fn index_page(mode: Mode) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>LED</title></head><body>\
         <p>LED: <span id=\"led\">{mode}</span></p>\
         <button onclick=\"fetch('/toggle').then(r=>r.text())\
         .then(t=>document.getElementById('led').textContent=t)\">Toggle</button>\
         </body></html>"
    )
}

/// `GET /state` body.
pub fn state_json(mode: Mode, link: LinkStatus) -> Result<String, serde_json::Error> {
    serde_json::to_string(&StateView {
        led: mode.as_str(),
        connected: link.connected,
        ip: dotted(link.ip),
    })
}

/// Shared handles the route closures capture.
#[derive(Clone, Copy)]
pub struct Routes {
    endpoint: ToggleEndpoint<'static>,
    link: &'static GuardedCell<LinkStatus>,
}

impl Routes {
    pub fn new(state: &'static ControlState, link: &'static GuardedCell<LinkStatus>) -> Self {
        Self {
            endpoint: ToggleEndpoint::new(state.writer(), state.reader()),
            link,
        }
    }

    pub fn index(&self) -> String {
        index_page(self.endpoint.current())
    }

    pub fn toggle(&self) -> &'static str {
        self.endpoint.toggle()
    }

    pub fn state(&self) -> Result<String, serde_json::Error> {
        state_json(self.endpoint.current(), self.link.read())
    }
}

/// Start the server on `port` and register all routes.  The server stops
/// when the returned handle is dropped.
#[cfg(target_os = "espidf")]
pub fn start(port: u16, routes: Routes) -> anyhow::Result<EspHttpServer<'static>> {
    let mut server = EspHttpServer::new(&Configuration {
        http_port: port,
        ..Default::default()
    })?;

    server.fn_handler::<anyhow::Error, _>("/", Method::Get, move |req| {
        let body = routes.index();
        req.into_response(200, Some("OK"), &[("Content-Type", "text/html")])?
            .write_all(body.as_bytes())?;
        Ok(())
    })?;

    server.fn_handler::<anyhow::Error, _>("/toggle", Method::Get, move |req| {
        let token = routes.toggle();
        req.into_response(200, Some("OK"), &[("Content-Type", "text/plain")])?
            .write_all(token.as_bytes())?;
        Ok(())
    })?;

    server.fn_handler::<anyhow::Error, _>("/state", Method::Get, move |req| {
        let body = routes.state()?;
        req.into_response(200, Some("OK"), &[("Content-Type", "application/json")])?
            .write_all(body.as_bytes())?;
        Ok(())
    })?;

    info!("HTTP: listening on port {}", port);
    Ok(server)
}
