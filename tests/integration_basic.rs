mod common;

use anyhow::Result;
use common::{MenuFixture, shexec};
use predicates::prelude::*;

const OFFICE_MENU: &str = "<Menu><Name>Office</Name><Include><Category>Office</Category></Include></Menu>";

#[test]
fn test_single_category_menu() -> Result<()> {
    let fx = MenuFixture::new()?;
    fx.applications_menu(OFFICE_MENU)?;
    fx.app("writer.desktop", "Writer", "writer --new-doc", "Categories=Office;")?;

    fx.command()?
        .assert()
        .success()
        .stdout("(Applications, (Office, (Writer, SHEXEC, \"writer --new-doc\")))\n");

    Ok(())
}

#[test]
fn test_field_codes_are_stripped() -> Result<()> {
    let fx = MenuFixture::new()?;
    fx.applications_menu(OFFICE_MENU)?;
    fx.app("writer.desktop", "Writer", "writer --new-doc %U", "Categories=Office;")?;

    fx.command()?
        .assert()
        .success()
        .stdout(predicate::str::contains(shexec("Writer", "writer --new-doc")));

    Ok(())
}

#[test]
fn test_missing_menu_file_fails() -> Result<()> {
    let fx = MenuFixture::new()?;

    fx.command()?
        .args(["--file", "/nonexistent/path/test.menu"])
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Failed to load tree"));

    Ok(())
}

#[test]
fn test_invalid_menu_xml_fails() -> Result<()> {
    let fx = MenuFixture::new()?;
    let path = fx.path().join("broken.menu");
    std::fs::write(&path, "<Menu><Name>Broken</Name>")?;

    fx.command()?
        .arg("-f")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load tree"));

    Ok(())
}

#[test]
fn test_empty_menu_prints_empty_array() -> Result<()> {
    let fx = MenuFixture::new()?;
    fx.applications_menu("")?;

    fx.command()?
        .assert()
        .success()
        .stdout("()\n")
        .stderr(predicate::str::contains("Menu tree is empty"));

    Ok(())
}

#[test]
fn test_explicit_menu_file() -> Result<()> {
    let fx = MenuFixture::new()?;
    fx.applications_menu(OFFICE_MENU)?;
    fx.menu(
        "games.menu",
        "<Menu><Name>Games</Name><Include><Category>Game</Category></Include></Menu>",
    )?;
    fx.app("writer.desktop", "Writer", "writer", "Categories=Office;")?;
    fx.app("chess.desktop", "Chess", "chess", "Categories=Game;")?;

    fx.command()?
        .args(["-f", "games.menu"])
        .assert()
        .success()
        .stdout("(Applications, (Games, (Chess, SHEXEC, chess)))\n");

    Ok(())
}

#[test]
fn test_system_config_and_data_dirs() -> Result<()> {
    let fx = MenuFixture::new()?;
    let system_config = fx.path().join("no-system-config/menus");
    let system_apps = fx.path().join("no-system-data/applications");
    std::fs::create_dir_all(&system_config)?;
    std::fs::create_dir_all(&system_apps)?;
    std::fs::write(
        system_config.join("applications.menu"),
        format!("<Menu><Name>Applications</Name><DefaultAppDirs/>{OFFICE_MENU}</Menu>"),
    )?;
    std::fs::write(
        system_apps.join("calc.desktop"),
        "[Desktop Entry]\nType=Application\nName=Calc\nExec=calc %F\nCategories=Office;\n",
    )?;
    fx.app("writer.desktop", "Writer", "writer", "Categories=Office;")?;

    fx.command()?
        .assert()
        .success()
        .stdout("(Applications, (Office, (Calc, SHEXEC, calc), (Writer, SHEXEC, writer)))\n");

    Ok(())
}

#[test]
fn test_include_nodisplay_flag() -> Result<()> {
    let fx = MenuFixture::new()?;
    fx.applications_menu(OFFICE_MENU)?;
    fx.app("writer.desktop", "Writer", "writer", "Categories=Office;")?;
    fx.app("hidden.desktop", "Helper", "helper", "Categories=Office;\nNoDisplay=true")?;

    fx.command()?
        .assert()
        .success()
        .stdout(predicate::str::contains("Helper").not());

    fx.command()?
        .arg("-n")
        .assert()
        .success()
        .stdout(predicate::str::contains(shexec("Helper", "helper")));

    Ok(())
}

#[test]
fn test_include_excluded_flag() -> Result<()> {
    let fx = MenuFixture::new()?;
    fx.applications_menu(
        "<Menu><Name>Office</Name>\
           <Include><Category>Office</Category></Include>\
           <Exclude><Filename>calc.desktop</Filename></Exclude>\
         </Menu>",
    )?;
    fx.app("writer.desktop", "Writer", "writer", "Categories=Office;")?;
    fx.app("calc.desktop", "Calc", "calc", "Categories=Office;")?;

    fx.command()?
        .assert()
        .success()
        .stdout("(Applications, (Office, (Writer, SHEXEC, writer)))\n");

    fx.command()?
        .arg("--include-excluded")
        .assert()
        .success()
        .stdout("(Applications, (Office, (Calc, SHEXEC, calc), (Writer, SHEXEC, writer)))\n");

    Ok(())
}

#[test]
fn test_include_unallocated_flag() -> Result<()> {
    let fx = MenuFixture::new()?;
    fx.applications_menu(OFFICE_MENU)?;
    fx.app("writer.desktop", "Writer", "writer", "Categories=Office;")?;
    fx.app("stray.desktop", "Stray", "stray", "Categories=Misc;")?;

    fx.command()?
        .assert()
        .success()
        .stdout(predicate::str::contains("Stray").not());

    fx.command()?
        .arg("-u")
        .assert()
        .success()
        .stdout("(Applications, (Office, (Writer, SHEXEC, writer)), (Stray, SHEXEC, stray))\n");

    Ok(())
}

#[test]
fn test_monitor_flag_is_accepted() -> Result<()> {
    let fx = MenuFixture::new()?;
    fx.applications_menu(OFFICE_MENU)?;
    fx.app("writer.desktop", "Writer", "writer", "Categories=Office;")?;

    fx.command()?
        .arg("--monitor")
        .assert()
        .success()
        .stdout("(Applications, (Office, (Writer, SHEXEC, writer)))\n");

    Ok(())
}

#[test]
fn test_directory_file_and_locale_from_config() -> Result<()> {
    let fx = MenuFixture::new()?;
    fx.applications_menu(
        "<Menu><Name>Office</Name><Directory>office.directory</Directory>\
           <Include><Category>Office</Category></Include></Menu>",
    )?;
    fx.directory("office.directory", "Office\nName[fr]=Bureautique", "")?;
    fx.app("writer.desktop", "Writer", "writer", "Categories=Office;\nName[fr]=Traitement")?;
    fx.config("[menu]\nlocale = \"fr_FR\"\n")?;

    fx.command()?
        .assert()
        .success()
        .stdout("(Applications, (Bureautique, (Traitement, SHEXEC, writer)))\n");

    Ok(())
}

#[test]
fn test_config_menu_file_and_compact_output() -> Result<()> {
    let fx = MenuFixture::new()?;
    let long = "x".repeat(70);
    fx.menu("long.menu", OFFICE_MENU)?;
    fx.app("writer.desktop", "Writer", &format!("writer --{long}"), "Categories=Office;")?;
    fx.config("[menu]\nfile = \"long.menu\"\n\n[output]\nindent = false\n")?;

    fx.command()?
        .assert()
        .success()
        .stdout(format!(
            "(Applications, (Office, (Writer, SHEXEC, \"writer --{long}\")))\n"
        ));

    Ok(())
}

#[test]
fn test_wide_menu_is_indented_by_default() -> Result<()> {
    let fx = MenuFixture::new()?;
    let long = "x".repeat(40);
    fx.applications_menu(OFFICE_MENU)?;
    fx.app("writer.desktop", "Writer", &format!("writer --{long}"), "Categories=Office;")?;

    let output = fx.command()?.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output)?;
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "(");
    assert_eq!(lines[1], "  Applications,");
    assert_eq!(lines[2], "  (");
    assert_eq!(lines[3], "    Office,");
    assert_eq!(lines[4], format!("    (Writer, SHEXEC, \"writer --{long}\")"));
    assert_eq!(lines[5], "  )");
    assert_eq!(lines[6], ")");

    Ok(())
}

#[test]
fn test_invalid_config_fails() -> Result<()> {
    let fx = MenuFixture::new()?;
    fx.applications_menu(OFFICE_MENU)?;
    fx.config("[menu\nfile = ")?;

    fx.command()?
        .assert()
        .code(1)
        .stderr(predicate::str::contains("wmxdgmenu.toml"));

    Ok(())
}

#[test]
fn test_unknown_config_key_warns() -> Result<()> {
    let fx = MenuFixture::new()?;
    fx.applications_menu(OFFICE_MENU)?;
    fx.app("writer.desktop", "Writer", "writer", "Categories=Office;")?;
    fx.config("[menu]\nshow_emtpy = true\n")?;

    fx.command()?
        .assert()
        .success()
        .stderr(predicate::str::contains("menu.show_emtpy"));

    Ok(())
}

#[test]
fn test_help_lists_flags() -> Result<()> {
    let fx = MenuFixture::new()?;

    fx.command()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--include-unallocated"))
        .stdout(predicate::str::contains("--monitor"));

    Ok(())
}
