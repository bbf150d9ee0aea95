/// Like `writeln!`, but nicely wraps lines.
///
/// Evaluates to an `io::Result<()>`.
macro_rules! wwriteln {
    {
        stream=$stream: expr
    } => {{
        let stream: &mut dyn std::io::Write = $stream;
        writeln!(stream)
    }};

    {
        stream=$stream: expr,
        indent=$i: expr,
        $($arg: expr),*
    } => {{
        let stream: &mut dyn std::io::Write = $stream;
        let i = $i;
        crate::output::wrapping::iwwriteln(
            stream,
            i.as_ref(), i.as_ref(),
            format_args!($($arg),*))
    }};

    {
        stream=$stream: expr,
        initial_indent=$ii: expr,
        subsequent_indent=$si: expr,
        $($arg: expr),*
    } => {{
        let stream: &mut dyn std::io::Write = $stream;
        let ii = $ii;
        let si = $si;
        crate::output::wrapping::iwwriteln(
            stream,
            ii.as_ref(), si.as_ref(),
            format_args!($($arg),*))
    }};

    {
        stream=$stream: expr,
        initial_indent=$ii: expr,
        $($arg: expr),*
    } => {{
        let stream: &mut dyn std::io::Write = $stream;
        let ii = $ii;
        let si = format!("{:1$}", "", ii.len());
        crate::output::wrapping::iwwriteln(
            stream, ii.as_ref(), si.as_ref(),
            format_args!($($arg),*))
    }};

    {
        stream=$stream: expr,
        $($arg: expr),*
    } => {{
        let stream: &mut dyn std::io::Write = $stream;
        crate::output::wrapping::wwriteln(
            stream, format_args!($($arg),*))
    }};
}

/// Like eprintln, but nicely wraps lines.
///
/// Like `eprintln` panics if it can't write to stderr.
macro_rules! weprintln {
    {
        initial_indent=$ii: expr,
        subsequent_indent=$si: expr,
        $($arg: expr),*
    } => {
        if let Err(err) = wwriteln!(stream=&mut std::io::stderr(),
                                    initial_indent=$ii,
                                    subsequent_indent=$si,
                                    $($arg),*) {
            panic!("Error writing to stderr: {}", err);
        }
    };

    {
        $($arg: expr),*
    } => {
        if let Err(err) = wwriteln!(stream=&mut std::io::stderr(),
                                    $($arg),*) {
            panic!("Error writing to stderr: {}", err);
        }
    };
}
