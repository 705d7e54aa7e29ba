// src/executor/builtin/core.rs
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{Builtin, Dispatcher};
use crate::completion::find_executable;
use crate::error::ShellError;

/// Exit code requested by `exit`. A bad code is reported and exits with 1.
pub fn builtin_exit(args: &[String], err: &mut dyn Write) -> i32 {
    let Some(code) = args.get(1) else { return 0 };
    code.parse().unwrap_or_else(|_| {
        let e = ShellError::InvalidArgument { builtin: "exit", value: code.clone() };
        tracing::warn!("{e}");
        let _ = writeln!(err, "{e}");
        1
    })
}

/// Resolve the `cd` argument against the current directory and home.
fn cd_target(d: &Dispatcher, arg: Option<&str>, cwd: &Path) -> Result<PathBuf, ShellError> {
    let target = match arg {
        None | Some("") | Some("~") => d.home.clone(),
        Some("-") => match &d.prev_dir {
            Some(p) => p.clone(),
            None => return Err(ShellError::NoDirectory("no previous directory")),
        },
        Some(".") => cwd.to_path_buf(),
        Some("..") => cwd.parent().unwrap_or(cwd).to_path_buf(),
        Some(path) => match path.strip_prefix("~/") {
            Some(rest) => d.home.join(rest),
            None => cwd.join(path),
        },
    };
    Ok(target)
}

pub fn builtin_cd(d: &mut Dispatcher, args: &[String], out: &mut dyn Write) -> Result<i32, ShellError> {
    let cwd = std::env::current_dir()?;
    let arg = args.get(1).map(String::as_str);
    let target = cd_target(d, arg, &cwd)?;

    std::env::set_current_dir(&target).map_err(|source| ShellError::ChangeDir {
        path: PathBuf::from(arg.unwrap_or("~")),
        source,
    })?;

    if arg == Some("-") {
        writeln!(out, "{}", target.display())?;
    }
    d.prev_dir = Some(cwd);
    Ok(0)
}

pub fn builtin_pwd(out: &mut dyn Write) -> Result<i32, ShellError> {
    writeln!(out, "{}", std::env::current_dir()?.display())?;
    Ok(0)
}

pub fn builtin_echo(args: &[String], out: &mut dyn Write) -> Result<i32, ShellError> {
    writeln!(out, "{}", args[1..].join(" "))?;
    Ok(0)
}

pub fn builtin_clear(out: &mut dyn Write) -> Result<i32, ShellError> {
    write!(out, "\x1B[2J\x1B[H")?;
    out.flush()?;
    Ok(0)
}

/// `type` / `which`: say what each name would run as.
pub fn builtin_type(
    search_path: &[PathBuf],
    args: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<i32, ShellError> {
    if args.len() < 2 {
        return Err(ShellError::Usage(format!("{} <command>", args[0])));
    }

    let mut status = 0;
    for name in &args[1..] {
        if Builtin::lookup(name).is_some() {
            writeln!(out, "{name} is a shell builtin")?;
        } else if let Some(path) = find_executable(search_path, name) {
            writeln!(out, "{name} is {}", path.display())?;
        } else {
            writeln!(err, "{}", ShellError::NotFound(name.clone()))?;
            status = 1;
        }
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShellConfig;
    use crate::test_util::lock_cwd;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    fn dispatcher(home: &Path) -> Dispatcher {
        Dispatcher::new(&ShellConfig::new(vec![], home.to_path_buf()))
    }

    #[test]
    fn test_cd_target_rules() {
        let d = dispatcher(Path::new("/home/me"));
        let cwd = Path::new("/work/src");
        assert_eq!(cd_target(&d, None, cwd).unwrap(), PathBuf::from("/home/me"));
        assert_eq!(cd_target(&d, Some("~"), cwd).unwrap(), PathBuf::from("/home/me"));
        assert_eq!(cd_target(&d, Some("~/docs"), cwd).unwrap(), PathBuf::from("/home/me/docs"));
        assert_eq!(cd_target(&d, Some("."), cwd).unwrap(), PathBuf::from("/work/src"));
        assert_eq!(cd_target(&d, Some(".."), cwd).unwrap(), PathBuf::from("/work"));
        assert_eq!(cd_target(&d, Some("lib"), cwd).unwrap(), PathBuf::from("/work/src/lib"));
        assert_eq!(cd_target(&d, Some("/etc"), cwd).unwrap(), PathBuf::from("/etc"));
        assert_eq!(cd_target(&d, Some(".."), Path::new("/")).unwrap(), PathBuf::from("/"));
        assert!(cd_target(&d, Some("-"), cwd).is_err());
    }

    #[test]
    fn test_cd_home_when_unset_is_root() {
        // ShellConfig::from_env maps an unset HOME to "/"
        let d = dispatcher(Path::new("/"));
        assert_eq!(cd_target(&d, None, Path::new("/tmp")).unwrap(), PathBuf::from("/"));
    }

    #[test]
    fn test_cd_missing_dir_keeps_cwd() {
        let _cwd = lock_cwd();
        let dir = tempfile::tempdir().unwrap();
        let start = dir.path().canonicalize().unwrap();
        std::env::set_current_dir(&start).unwrap();

        let mut d = dispatcher(&start);
        let mut out = Vec::new();
        let e = builtin_cd(&mut d, &args("cd does-not-exist"), &mut out).unwrap_err();
        assert!(e.to_string().starts_with("cd: does-not-exist: "));
        assert_eq!(std::env::current_dir().unwrap(), start);
    }

    #[test]
    fn test_cd_bare_goes_home_and_dash_returns() {
        let _cwd = lock_cwd();
        let home = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let home_path = home.path().canonicalize().unwrap();
        let work_path = work.path().canonicalize().unwrap();
        std::env::set_current_dir(&work_path).unwrap();

        let mut d = dispatcher(&home_path);
        let mut out = Vec::new();
        builtin_cd(&mut d, &args("cd"), &mut out).unwrap();
        assert_eq!(std::env::current_dir().unwrap(), home_path);

        builtin_cd(&mut d, &args("cd -"), &mut out).unwrap();
        assert_eq!(std::env::current_dir().unwrap(), work_path);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", work_path.display()));
    }

    #[test]
    fn test_type_builtin_path_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("mytool");
        fs::write(&tool, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        let search = vec![dir.path().to_path_buf()];

        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = builtin_type(&search, &args("type cd mytool nothere"), &mut out, &mut err).unwrap();
        assert_eq!(status, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("cd is a shell builtin\nmytool is {}\n", tool.display())
        );
        assert_eq!(String::from_utf8(err).unwrap(), "nothere: not found\n");
    }

    #[test]
    fn test_type_usage() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let e = builtin_type(&[], &args("which"), &mut out, &mut err).unwrap_err();
        assert_eq!(e.to_string(), "usage: which <command>");
        assert_eq!(e.status(), 2);
    }
}
