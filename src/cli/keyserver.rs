//! Command-line parser for the keyserver operations.

use clap::Args;

use super::types::ClapData;
use super::types::FileOrStdin;
use super::types::FileOrStdout;
use super::types::parse_variable;

#[derive(Debug, Args)]
#[clap(
    about = "Retrieve a certificate",
    long_about =
"Retrieve a certificate from the keyserver

Looks up the certificate with the given key ID, and writes the \
server's answer, usually an ASCII armored certificate, to stdout or \
the file given using `--output`.  It is an error if the server \
doesn't know the certificate, or cannot be reached.
",
    after_help =
"EXAMPLES:

# Retrieve a certificate by its key ID
$ hkp get 0x2D230C5F

# Retrieve a certificate using a fingerprint, from a different server
$ hkp --server hkp://pgp.mit.edu get 0xEB8F8F5A8A6FD3B53E4E13E9C1BC4D4B2D230C5F
",
)]
pub struct GetCommand {
    #[clap(
        value_name = "KEYID",
        help = "Retrieve the certificate with KEYID",
        long_help = "\
Retrieve the certificate with KEYID.

KEYID is a V4 key ID or fingerprint of 8, 16, 32, or 40 hexadecimal \
digits, or a V3 fingerprint of 32 digits, optionally prefixed with \
`0x`.",
    )]
    pub key_id: String,

    #[clap(
        help = FileOrStdout::HELP,
        long,
        short,
        value_name = FileOrStdout::VALUE_NAME,
        default_value_t = FileOrStdout::default(),
    )]
    pub output: FileOrStdout,
}

#[derive(Debug, Args)]
#[clap(
    about = "Search for certificates",
    long_about =
"Search for certificates on the keyserver

Asks the server for an index of the certificates matching QUERY, and \
lists them.  The list includes the primary key's ID, algorithm, size, \
and validity, as well as the User IDs.  Use `--output-format json` to \
get a machine-readable list.  It is an error if nothing is found.
",
    after_help =
"EXAMPLES:

# Search for certificates with a User ID containing an email address
$ hkp search alice@example.org

# Only list certificates with a User ID matching exactly
$ hkp search --exact 'Alice <alice@example.org>'
",
)]
pub struct SearchCommand {
    #[clap(
        value_name = "QUERY",
        help = "Search for certificates matching QUERY",
    )]
    pub query: String,

    #[clap(
        long,
        value_name = "OPERATION",
        default_value = "index",
        help = "Use OPERATION instead of `index`",
        long_help = "\
Use OPERATION instead of `index`.

Only `index` and server specific operations starting with `x-` are \
allowed.",
    )]
    pub operation: String,

    #[clap(
        long,
        help = "Only list certificates matching QUERY exactly",
    )]
    pub exact: bool,

    #[clap(
        long = "variable",
        value_name = "NAME=VALUE",
        value_parser = parse_variable,
        help = "Send the extension variable NAME (can be given multiple times)",
        long_help = "\
Send the extension variable NAME with VALUE.  Can be given multiple \
times.

Only variables starting with `x-` are sent to the server, others are \
ignored.",
    )]
    pub variables: Vec<(String, String)>,
}

#[derive(Debug, Args)]
#[clap(
    about = "Submit a certificate",
    long_about =
"Submit a certificate to the keyserver

Reads an ASCII armored certificate from FILE, or stdin, and sends it \
to the keyserver.  Prints the HTTP status code of the reply.  It is \
an error if the server doesn't accept the certificate.
",
    after_help =
"EXAMPLES:

# Publish a certificate
$ hkp send alice.pgp
",
)]
pub struct SendCommand {
    #[clap(
        default_value_t = FileOrStdin::default(),
        help = FileOrStdin::HELP,
        value_name = FileOrStdin::VALUE_NAME,
    )]
    pub input: FileOrStdin,
}
