//! A keyserver for testing.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http_body_util::{combinators::BoxBody, BodyExt, Full};
use http::{Request, Response};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

pub const KEY: &str = "-----BEGIN PGP PUBLIC KEY BLOCK-----

xsBNBFoVcvoBCACykTKOJddF8SSUAfCDHk86cNTaYnjCoy72rMgWJsrMLnz/V16B
J9M7l6nrQ0JMnH2Du02A3w+kNb5q97IZ/M6NkqOOl7uqjyRGPV+XKwt0G5mN/ovg
8630BZAYS3QzavYf3tni9aikiGH+zTFX5pynTNfYRXNBof3Xfzl92yad2bIt4ITD
NfKPvHRko/tqWbclzzEn72gGVggt1/k/0dKhfsGzNogHxg4GIQ/jR/XcqbDFR3RC
/JJjnTOUPGsC1y82Xlu8udWBVn5mlDyxkad5laUpWWg17anvczEAyx4TTOVItLSu
43iPdKHSs9vMXWYID0bg913VusZ2Ofv690nDABEBAAG0JFRlc3R5IE1jVGVzdGZh
Y2UgPHRlc3R5QGV4YW1wbGUub3JnPsLAlAQTAQgAPhYhBD6Id8h3J0aSl1GJ9dA/
b4ZSJv6LBQJaFXL6AhsDBQkDwmcABQsJCAcCBhUICQoLAgQWAgMBAh4BAheAAAoJ
ENA/b4ZSJv6Lxo8H/1XMt+Nqa6e0SG/up3ypKe5nplA0p/9j/s2EIsP8S8uPUd+c
WS17XOmPwkNDmHeL3J6hzwL74NlYSLEtyf7WoOV74xAKQA9WkqaKPHCtpll8aFWA
ktQDLWTPeKuUuSlobAoRtO17ZmheSQzmm7JYt4Ahkxt3agqGT05OsaAey6nIKqpq
ArokvdHTZ7AFZeSJIWmuCoT9M1lo3LAtLnRGOhBMJ5dDIeOwflJwNBXlJVi4mDPK
+fumV0MbSPvZd1/ivFjSpQyudWWtv1R1nAK7+a4CPTGxPvAQkLtRsL/V+Q7F3BJG
jAn4QVx8p4t3NOPuNgcoZpLBE3sc4Nfs5/CphMLOwE0EWhVy+gEIALSpjYD+tuWC
rj6FGP6crQjQzVlH+7axoM1ooTwiPs4fzzt2iLw3CJyDUviM5F9ZBQTei635RsAR
a/CJTSQYAEU5yXXxhoe0OtwnuvsBSvVT7Fox3pkfNTQmwMvkEbodhfKpqBbDKCL8
f5A8Bb7aISsLf0XRHWDkHVqlz8LnOR3f44wEWiTeIxLc8S1QtwX/ExyW47oPsjs9
ShCmwfSpcngH/vGBRTO7WeI54xcAtKSm/20B/MgrUl5qFo17kUWot2C6KjuZKkHk
3WZmJwQz+6rTB11w4AXt8vKkptYQCkfat2FydGpgRO5dVg6aWNJefOJNkC7MmlzC
ZrrAK8FJ6jcAEQEAAcLAdgQYAQgAIBYhBD6Id8h3J0aSl1GJ9dA/b4ZSJv6LBQJa
FXL6AhsMAAoJENA/b4ZSJv6Lt7kH/jPr5wg8lcamuLj4lydYiLttvvTtDTlD1TL+
IfwVARB/ruoerlEDr0zX1t3DCEcvJDiZfOqJbXtHt70+7NzFXrYxfaNFmikMgSQT
XqHrMQho4qpseVOeJPWGzGOcrxCdw/ZgrWbkDlAU5KaIvk+M4wFPivjbtW2Ro2/F
J4I/ZHhJlIPmM+hUErHC103b08pBENXDQlXDma7LijH5kWhyfF2Ji7Ft0EjghBaW
AeGalQHjc5kAZu5R76Mwt06MEQ/HL1pIvufTFxkr/SzIv8Ih7Kexb0IrybmfD351
Pu1xwz57O4zo1VYf6TqHJzVC3OMvMUM2hhdecMUe5x6GorNaj6g=
=z5uK
-----END PGP PUBLIC KEY BLOCK-----";

pub const FP: &str = "3E8877C877274692975189F5D03F6F865226FE8B";
pub const ID: &str = "D03F6F865226FE8B";

/// The index returned when searching for `testy`.
pub const INDEX: &str = "info:1:2\r\n\
    pub:D03F6F865226FE8B:1:2048:1511355130::\r\n\
    uid:Testy%20McTestface%20%3Ctesty@example.org%3E:1511355130::\r\n\
    pub:AABBCCDD:17:1024:1136214245:1167750245:r\r\n\
    uid:Rita%20Revoked:1136214245::r\r\n";

/// The query that results in a malformed index.
pub const GARBAGE: &str = "garbage";

/// A request received by the keyserver.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub content_type: Option<String>,
}

impl Recorded {
    /// Returns the value of the given parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

type Log = Arc<Mutex<Vec<Recorded>>>;

type Reply = Result<Response<BoxBody<Bytes, hyper::Error>>, hyper::Error>;

async fn service(req: Request<hyper::body::Incoming>, log: Log) -> Reply {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let content_type = req.headers().get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let params: Vec<(String, String)> = if method == Method::POST {
        let b = req.collect().await?.to_bytes();
        url::form_urlencoded::parse(&b).into_owned().collect()
    } else {
        req.uri().query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes())
                 .into_owned().collect())
            .unwrap_or_default()
    };

    let recorded = Recorded { method, path, params, content_type };
    log.lock().unwrap().push(recorded.clone());

    let ok = |body: String| -> Reply { Ok(Response::new(full(body))) };
    let status = |code: StatusCode, body: &'static str| -> Reply {
        Ok(Response::builder()
           .status(code)
           .body(full(body)).unwrap())
    };

    match (&recorded.method, recorded.path.as_str()) {
        (&Method::GET, "/pks/lookup") => {
            let search = recorded.param("search").unwrap_or_default();
            match recorded.param("op") {
                Some("get") => {
                    if search == format!("0x{}", ID)
                        || search == format!("0x{}", FP)
                    {
                        // Servers like to pad their answers.
                        ok(format!("{}\n\n  \n", KEY))
                    } else {
                        status(StatusCode::NOT_FOUND, "No results found")
                    }
                },
                Some(op) if op == "index" || op.starts_with("x-") => {
                    match search {
                        "testy" => ok(INDEX.into()),
                        GARBAGE => ok("info:1:1\npub:ZZ:seventeen:::::\n".into()),
                        _ => status(StatusCode::NOT_FOUND, "No results found"),
                    }
                },
                _ => status(StatusCode::NOT_IMPLEMENTED, "Not implemented"),
            }
        },
        (&Method::POST, "/pks/add") => {
            match recorded.param("keytext") {
                Some(k) if k.contains("-----BEGIN PGP PUBLIC KEY BLOCK-----") =>
                    ok("Ok".into()),
                _ => status(StatusCode::BAD_REQUEST, "Bad key"),
            }
        },
        _ => status(StatusCode::NOT_FOUND, "Not found"),
    }
}

fn full<T: Into<Bytes>>(chunk: T) -> BoxBody<Bytes, hyper::Error> {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed()
}

/// A keyserver listening on localhost.
pub struct MockKeyServer {
    addr: SocketAddr,
    log: Log,
    /// The runtime driving the server, if it runs in the background.
    runtime: Option<tokio::runtime::Runtime>,
}

impl MockKeyServer {
    /// Starts a server on a random port on the current runtime.
    pub async fn start() -> Self {
        let socket = TcpListener::bind("127.0.0.1:0").await
            .expect("can bind to localhost");
        let addr = socket.local_addr().expect("has an address");
        let log: Log = Default::default();

        async fn server(l: TcpListener, log: Log) {
            while let Ok((stream, _)) = l.accept().await {
                let io = TokioIo::new(stream);
                let log = log.clone();
                tokio::task::spawn(async move {
                    if let Err(err) = http1::Builder::new()
                        .serve_connection(
                            io, service_fn(move |req| service(req, log.clone())))
                        .await
                    {
                        eprintln!("Error serving connection: {:?}", err);
                    }
                });
            }
        }

        tokio::spawn(server(socket, log.clone()));

        MockKeyServer { addr, log, runtime: None }
    }

    /// Starts a server on a random port on its own runtime.
    ///
    /// The server is stopped when the returned value is dropped.
    pub fn start_in_background() -> Self {
        let rt = tokio::runtime::Runtime::new()
            .expect("can create a runtime");
        let mut server = rt.block_on(Self::start());
        server.runtime = Some(rt);
        server
    }

    /// Returns the server's `hkp://` URL.
    pub fn url(&self) -> String {
        format!("hkp://{}", self.addr)
    }

    /// Returns the requests received so far.
    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    /// Returns the last request received.
    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("received a request")
    }
}

/// Returns a URL nobody listens on.
pub async fn unreachable_url() -> String {
    let socket = TcpListener::bind("127.0.0.1:0").await
        .expect("can bind to localhost");
    let addr = socket.local_addr().expect("has an address");
    drop(socket);
    format!("hkp://{}", addr)
}
