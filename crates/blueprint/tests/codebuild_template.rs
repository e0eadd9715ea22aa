//! End-to-end checks of the rendered CodeBuild template.

use blueprint::{
    Blueprint, BlueprintConfig, BlueprintError, BlueprintVariables, CodeBuildBlueprint, Effect,
    Expr, GitHubAccountId, Template, WebhookFilterType, DEPLOY_NAME,
};
use proptest::prelude::*;
use serde_json::{json, Value};

const REPO_URL: &str = "https://github.com/onicagroup/runway";

fn literal_template(environment: &str, url: &str) -> Result<Template, BlueprintError> {
    let variables = BlueprintVariables::from_values(environment, url)?;
    CodeBuildBlueprint::new("test", variables, BlueprintConfig::default()).create_template()
}

fn rendered(template: &Template) -> Result<Value, BlueprintError> {
    Ok(serde_json::from_str(&template.to_json()?)?)
}

#[test]
fn template_has_one_role_and_one_project() -> Result<(), BlueprintError> {
    let template = literal_template("test", REPO_URL)?;

    assert_eq!(template.resources().len(), 2);
    assert_eq!(template.roles().count(), 1);
    assert_eq!(template.projects().count(), 1);
    assert_eq!(template.description(), "Runway CodeBuild Project");
    Ok(())
}

#[test]
fn every_allow_has_matching_deny() -> Result<(), BlueprintError> {
    let template = literal_template("test", REPO_URL)?;
    let Some(role) = template.roles().next() else {
        panic!("template has no role");
    };
    let statements = role.policies()[0].policy_document().statements();

    let allows = statements.iter().filter(|s| s.effect() == Effect::Allow).collect::<Vec<_>>();
    let denies = statements.iter().filter(|s| s.effect() == Effect::Deny).collect::<Vec<_>>();
    assert_eq!(allows.len(), 5);
    assert_eq!(allows.len(), denies.len());

    for allow in allows {
        let scope = allow.resources();
        assert!(scope.is_some());
        let matching = denies
            .iter()
            .filter(|deny| deny.actions() == allow.actions() && deny.not_resources() == scope)
            .count();
        assert_eq!(matching, 1, "allow on {:?} must have exactly one deny", allow.actions());
    }
    Ok(())
}

#[test]
fn source_location_is_input_url_verbatim() -> Result<(), BlueprintError> {
    let template = literal_template("test", REPO_URL)?;
    let Some(project) = template.projects().next() else {
        panic!("template has no project");
    };

    assert_eq!(project.source().location(), &Expr::literal(REPO_URL));
    Ok(())
}

#[test]
fn filter_group_has_four_conditions_in_order() -> Result<(), BlueprintError> {
    let template = literal_template("test", REPO_URL)?;
    let Some(project) = template.projects().next() else {
        panic!("template has no project");
    };
    let triggers = project.triggers();

    assert!(triggers.is_webhook_enabled());
    assert_eq!(triggers.filter_groups().len(), 1);
    let kinds = triggers.filter_groups()[0]
        .filters()
        .iter()
        .map(|f| f.kind())
        .collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [
            WebhookFilterType::ActorAccountId,
            WebhookFilterType::Event,
            WebhookFilterType::BaseRef,
            WebhookFilterType::HeadRef,
        ]
    );
    Ok(())
}

#[test]
fn environment_variables_carry_ci_and_deploy_environment() -> Result<(), BlueprintError> {
    let template = literal_template("test", REPO_URL)?;
    let Some(project) = template.projects().next() else {
        panic!("template has no project");
    };
    let env = project.environment();

    let deploy = env.variable("DEPLOY_ENVIRONMENT").map(|v| v.value().clone());
    let ci = env.variable("CI").map(|v| v.value().clone());
    assert_eq!(deploy, Some(Expr::literal("test")));
    assert_eq!(ci, Some(Expr::literal("1")));
    Ok(())
}

#[test]
fn rendered_project_matches_expected_document() -> Result<(), BlueprintError> {
    let value = rendered(&literal_template("test", REPO_URL)?)?;
    let project = &value["Resources"]["RunwayIntegrationTests"];

    assert_eq!(project["Type"], json!("AWS::CodeBuild::Project"));
    assert_eq!(
        project["Properties"],
        json!({
            "Artifacts": {"Type": "NO_ARTIFACTS"},
            "Environment": {
                "ComputeType": "BUILD_GENERAL1_SMALL",
                "EnvironmentVariables": [
                    {"Name": "CI", "Type": "PLAINTEXT", "Value": "1"},
                    {"Name": "DEPLOY_ENVIRONMENT", "Type": "PLAINTEXT", "Value": "test"}
                ],
                "Image": "aws/codebuild/standard:2.0",
                "Type": "LINUX_CONTAINER"
            },
            "Name": DEPLOY_NAME,
            "ServiceRole": {"Fn::GetAtt": ["CodeBuildRole", "Arn"]},
            "Source": {"Type": "GITHUB", "Location": REPO_URL},
            "Triggers": {
                "Webhook": true,
                "FilterGroups": [[
                    {"Type": "ACTOR_ACCOUNT_ID", "Pattern": "627555"},
                    {
                        "Type": "EVENT",
                        "Pattern": "PULL_REQUEST_CREATED,PULL_REQUEST_UPDATED,PULL_REQUEST_REOPENED"
                    },
                    {"Type": "BASE_REF", "Pattern": "^refs/heads/release$"},
                    {"Type": "HEAD_REF", "Pattern": "^refs/heads/master$"}
                ]]
            }
        })
    );
    Ok(())
}

#[test]
fn rendered_role_scopes_resources_to_suite_prefix() -> Result<(), BlueprintError> {
    let value = rendered(&literal_template("test", REPO_URL)?)?;
    let properties = &value["Resources"]["CodeBuildRole"]["Properties"];

    assert_eq!(
        properties["AssumeRolePolicyDocument"]["Statement"][0]["Principal"],
        json!({"Service": ["codebuild.amazonaws.com"]})
    );

    let policy = &properties["Policies"][0];
    assert_eq!(policy["PolicyName"], json!({"Fn::Join": ["", [DEPLOY_NAME, "-policy"]]}));

    let statements = &policy["PolicyDocument"]["Statement"];
    assert_eq!(
        statements[2],
        json!({
            "Effect": "Allow",
            "Action": ["cloudformation:*"],
            "Resource": [{"Fn::Join": [":", [
                "arn",
                {"Ref": "AWS::Partition"},
                "cloudformation",
                {"Ref": "AWS::Region"},
                {"Ref": "AWS::AccountId"},
                {"Fn::Sub": ["stack/${prefix}/*", {"prefix": "testsuite-tf-state"}]}
            ]]}]
        })
    );
    assert_eq!(statements[3]["Effect"], json!("Deny"));
    assert_eq!(statements[3]["NotResource"], statements[2]["Resource"]);
    assert_eq!(
        statements[0]["Action"],
        json!(["logs:CreateLogGroup", "logs:CreateLogStream", "logs:PutLogEvents"])
    );
    assert_eq!(
        statements[8]["Resource"][0]["Fn::Join"][1][5],
        json!("terraform-*")
    );
    Ok(())
}

#[test]
fn parameter_bound_variables_declare_parameters_and_use_refs() -> Result<(), BlueprintError> {
    let blueprint = CodeBuildBlueprint::new(
        "test",
        BlueprintVariables::as_parameters(),
        BlueprintConfig::default(),
    );
    let value = rendered(&blueprint.create_template()?)?;

    assert_eq!(
        value["Parameters"],
        json!({
            "EnvironmentName": {"Type": "String", "Description": "Name of environment"},
            "GitHubUrl": {"Type": "String", "Description": "URL to GitHub repository"}
        })
    );
    let properties = &value["Resources"]["RunwayIntegrationTests"]["Properties"];
    assert_eq!(properties["Source"]["Location"], json!({"Ref": "GitHubUrl"}));
    assert_eq!(
        properties["Environment"]["EnvironmentVariables"][1]["Value"],
        json!({"Ref": "EnvironmentName"})
    );
    Ok(())
}

#[test]
fn literal_variables_declare_no_parameters() -> Result<(), BlueprintError> {
    let value = rendered(&literal_template("test", REPO_URL)?)?;
    assert!(value.get("Parameters").is_none());
    Ok(())
}

#[test]
fn configured_accounts_are_joined_with_pipe() -> Result<(), BlueprintError> {
    let config = BlueprintConfig::new(vec![GitHubAccountId::new(627555), GitHubAccountId::new(1)])?;
    let variables = BlueprintVariables::from_values("test", REPO_URL)?;
    let template = CodeBuildBlueprint::new("test", variables, config).create_template()?;
    let Some(project) = template.projects().next() else {
        panic!("template has no project");
    };

    assert_eq!(project.triggers().filter_groups()[0].filters()[0].pattern(), "627555|1");
    Ok(())
}

proptest! {
    #[test]
    fn rendering_is_deterministic(environment in "[a-z0-9-]{1,16}", url in "https://[a-z]{1,12}\\.com/[a-z/]{0,20}") {
        let first = literal_template(&environment, &url).and_then(|t| t.to_json());
        let second = literal_template(&environment, &url).and_then(|t| t.to_json());
        prop_assert!(first.is_ok());
        prop_assert_eq!(first.ok(), second.ok());
    }

    #[test]
    fn any_non_empty_inputs_yield_role_and_project(environment in ".{1,24}", url in ".{1,48}") {
        let template = literal_template(&environment, &url);
        prop_assert!(template.is_ok());
        if let Ok(template) = template {
            prop_assert_eq!(template.roles().count(), 1);
            prop_assert_eq!(template.projects().count(), 1);
            let location = template.projects().next().map(|p| p.source().location().clone());
            prop_assert_eq!(location, Some(Expr::literal(url.clone())));
        }
    }
}
